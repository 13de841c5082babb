use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day's counts for a single architecture, stored on the wire as the
/// pair `[installs+updates, updates]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ArchCounts(pub u64, pub u64);

impl ArchCounts {
    pub fn installs_and_updates(self) -> u64 {
        self.0
    }

    /// Updates can exceed the combined count in anomalous exports; clamped at zero.
    pub fn installs(self) -> u64 {
        self.0.saturating_sub(self.1)
    }

    pub fn updates(self) -> u64 {
        self.1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub arches: BTreeMap<String, ArchCounts>,
}

/// Wire shape of a per-ref series file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesFile {
    pub stats: Vec<DownloadRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Point {
    pub date: NaiveDate,
    pub downloads: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub arch: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Summary {
    pub total: u64,
    pub average_per_day: f64,
}

/// Valid item identifiers, loaded once from the manifest and immutable after.
/// Keeps manifest order, so `first` is a stable fallback ref.
#[derive(Debug, Clone, Default)]
pub struct KnownRefs(Vec<String>);

impl KnownRefs {
    pub fn new(refs: Vec<String>) -> Self {
        Self(refs)
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.0.iter().any(|known| known == candidate)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub interval: String,
    pub granularity: u32,
    #[serde(rename = "downloadType")]
    pub download_type: String,
    /// Canonical fragment for this view, for the page to write back to the URL.
    pub fragment: String,
    pub min_date: Option<NaiveDate>,
    pub datasets: Vec<Dataset>,
    pub summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub min_date: Option<NaiveDate>,
    pub summary: Option<Summary>,
}
