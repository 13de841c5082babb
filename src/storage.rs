use crate::errors::AppError;
use crate::models::{DownloadRecord, KnownRefs, SeriesFile};
use std::{
    env,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{error, warn};

pub fn resolve_data_dir() -> PathBuf {
    match env::var("APP_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => PathBuf::from("data"),
    }
}

/// Loads the refs manifest. A missing or unreadable manifest leaves the
/// server up with no refs; data endpoints then answer 503.
pub async fn load_refs(dir: &Path) -> KnownRefs {
    let path = dir.join("refs.json");
    match fs::read(&path).await {
        Ok(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
            Ok(refs) => {
                let refs = KnownRefs::new(refs);
                if refs.is_empty() {
                    warn!("refs manifest {} lists no refs", path.display());
                }
                refs
            }
            Err(err) => {
                error!("failed to parse refs manifest: {err}");
                KnownRefs::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("refs manifest {} not found", path.display());
            KnownRefs::default()
        }
        Err(err) => {
            error!("failed to read refs manifest: {err}");
            KnownRefs::default()
        }
    }
}

/// Series files are named after the ref with every `/` flattened to `_`.
pub fn series_file_name(ref_id: &str) -> String {
    format!("{}.json", ref_id.replace('/', "_"))
}

pub async fn load_series(dir: &Path, ref_id: &str) -> Result<Vec<DownloadRecord>, AppError> {
    let path = dir.join(series_file_name(ref_id));
    let bytes = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found(format!(
                "no statistics recorded for {ref_id}"
            )));
        }
        Err(err) => return Err(AppError::internal(err)),
    };
    let file: SeriesFile = serde_json::from_slice(&bytes).map_err(AppError::internal)?;

    // Bucketing is positional, so the series must be date-ascending even if
    // the file on disk is not.
    let mut stats = file.stats;
    stats.sort_by_key(|record| record.date);
    Ok(stats)
}
