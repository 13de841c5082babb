pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod viewstate;

pub use app::router;
pub use state::AppState;
pub use storage::{load_refs, resolve_data_dir};
