use crate::models::{Dataset, DownloadRecord, Point, Summary};
use crate::viewstate::DownloadType;
use chrono::{Local, NaiveDate};

/// Derives one dataset per architecture from a date-ordered series.
///
/// Datasets appear in first-seen order across the series. An architecture
/// absent from a record contributes no point for that date. With
/// `granularity > 1` each dataset's points are re-bucketed into consecutive
/// windows of that many points, summed, keyed by the first date in the
/// window; the final window may be shorter.
pub fn compute_datasets(
    series: &[DownloadRecord],
    download_type: DownloadType,
    granularity: u32,
) -> Vec<Dataset> {
    let mut datasets: Vec<Dataset> = Vec::new();

    for record in series {
        for (arch, counts) in &record.arches {
            let downloads = match download_type {
                DownloadType::InstallsAndUpdates => counts.installs_and_updates(),
                DownloadType::Installs => counts.installs(),
                DownloadType::Updates => counts.updates(),
            };
            let position = match datasets.iter().position(|dataset| dataset.arch == *arch) {
                Some(position) => position,
                None => {
                    datasets.push(Dataset {
                        arch: arch.clone(),
                        points: Vec::new(),
                    });
                    datasets.len() - 1
                }
            };
            datasets[position].points.push(Point {
                date: record.date,
                downloads,
            });
        }
    }

    if granularity > 1 {
        for dataset in &mut datasets {
            dataset.points = bucket_points(&dataset.points, granularity as usize);
        }
    }

    datasets
}

fn bucket_points(points: &[Point], granularity: usize) -> Vec<Point> {
    points
        .chunks(granularity)
        .filter_map(|window| {
            let first = window.first()?;
            Some(Point {
                date: first.date,
                downloads: window.iter().map(|point| point.downloads).sum(),
            })
        })
        .collect()
}

pub fn compute_summary(datasets: &[Dataset], min_date: Option<NaiveDate>) -> Option<Summary> {
    compute_summary_at(Local::now().date_naive(), datasets, min_date)
}

/// Total and average downloads per day over every point at or after
/// `min_date`. Returns `None` when no point qualifies, so an empty window
/// reads as "no data" instead of a division by nothing.
pub fn compute_summary_at(
    today: NaiveDate,
    datasets: &[Dataset],
    min_date: Option<NaiveDate>,
) -> Option<Summary> {
    let mut total = 0u64;
    let mut first: Option<NaiveDate> = None;

    for dataset in datasets {
        for point in &dataset.points {
            if min_date.map_or(false, |min| point.date < min) {
                continue;
            }
            total = total.saturating_add(point.downloads);
            if first.map_or(true, |earliest| point.date < earliest) {
                first = Some(point.date);
            }
        }
    }

    let first = first?;
    // A series whose first point is today still averages over one day.
    let days = (today - first).num_days().max(1);
    Some(Summary {
        total,
        average_per_day: total as f64 / days as f64,
    })
}
