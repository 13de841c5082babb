use crate::models::KnownRefs;
use chrono::{Duration, Local, NaiveDate};

pub const WIRE_UNBOUNDED: &str = "infinity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadType {
    #[default]
    InstallsAndUpdates,
    Installs,
    Updates,
}

impl DownloadType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InstallsAndUpdates => "installs+updates",
            Self::Installs => "installs",
            Self::Updates => "updates",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "installs+updates" => Some(Self::InstallsAndUpdates),
            "installs" => Some(Self::Installs),
            "updates" => Some(Self::Updates),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Unbounded,
    Days(u32),
}

impl Interval {
    pub fn parse(value: &str) -> Option<Self> {
        if value == WIRE_UNBOUNDED {
            return Some(Self::Unbounded);
        }
        match value.parse::<u32>() {
            Ok(days) if days >= 1 => Some(Self::Days(days)),
            _ => None,
        }
    }

    pub fn as_string(self) -> String {
        match self {
            Self::Unbounded => WIRE_UNBOUNDED.to_string(),
            Self::Days(days) => days.to_string(),
        }
    }
}

/// The user's current selections. Every field holds a valid value once
/// decoding completes; there is no partially-initialized state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub ref_id: String,
    pub interval: Interval,
    pub granularity: u32,
    pub download_type: DownloadType,
}

/// Serializes a view state to a query-string-shaped fragment. Fields at
/// their default are omitted, so a fresh view yields just `ref=...`.
pub fn encode_view_state(state: &ViewState) -> String {
    let mut fragment = format!("ref={}", urlencoding::encode(&state.ref_id));
    if let Interval::Days(days) = state.interval {
        fragment.push_str(&format!("&interval={days}"));
    }
    if state.granularity != 1 {
        fragment.push_str(&format!("&granularity={}", state.granularity));
    }
    if state.download_type != DownloadType::InstallsAndUpdates {
        fragment.push_str(&format!("&downloadType={}", state.download_type.as_str()));
    }
    fragment
}

/// Decodes a fragment into a complete view state. Unknown keys are ignored
/// and invalid values fall back silently to the field's default; a missing
/// or unrecognized `ref` falls back to the first known ref. Returns `None`
/// only when no refs are known, since there is then no valid `ref` at all.
pub fn decode_view_state(fragment: &str, refs: &KnownRefs) -> Option<ViewState> {
    let mut ref_id: Option<String> = None;
    let mut interval = Interval::default();
    let mut granularity = 1u32;
    let mut download_type = DownloadType::default();

    for pair in fragment.trim_start_matches('#').split('&') {
        let Some((key, raw_value)) = pair.split_once('=') else {
            continue;
        };
        let Ok(value) = urlencoding::decode(raw_value) else {
            continue;
        };
        match key {
            "ref" if refs.contains(&value) => ref_id = Some(value.into_owned()),
            "interval" => {
                if let Some(parsed) = Interval::parse(&value) {
                    interval = parsed;
                }
            }
            "granularity" => {
                if let Ok(parsed) = value.parse::<u32>() {
                    if parsed >= 1 {
                        granularity = parsed;
                    }
                }
            }
            "downloadType" => {
                if let Some(parsed) = DownloadType::parse(&value) {
                    download_type = parsed;
                }
            }
            _ => {}
        }
    }

    let ref_id = ref_id.or_else(|| refs.first().map(str::to_owned))?;
    Some(ViewState {
        ref_id,
        interval,
        granularity,
        download_type,
    })
}

/// Lower bound of the visible window: `None` when unbounded, else plain day
/// arithmetic back from `today`. Chart clipping and the summary must both
/// use the value computed for one request, never a cached one.
pub fn min_date_at(today: NaiveDate, interval: Interval) -> Option<NaiveDate> {
    match interval {
        Interval::Unbounded => None,
        Interval::Days(days) => Some(today - Duration::days(days as i64)),
    }
}

pub fn min_date(interval: Interval) -> Option<NaiveDate> {
    min_date_at(Local::now().date_naive(), interval)
}
