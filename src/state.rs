use crate::models::KnownRefs;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub refs: Arc<KnownRefs>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, refs: KnownRefs) -> Self {
        Self {
            data_dir,
            refs: Arc::new(refs),
        }
    }
}
