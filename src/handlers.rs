use crate::errors::AppError;
use crate::models::{DatasetsResponse, SummaryResponse};
use crate::state::AppState;
use crate::stats::{compute_datasets, compute_summary};
use crate::storage::load_series;
use crate::ui::render_index;
use crate::viewstate::{ViewState, decode_view_state, encode_view_state, min_date};
use axum::{
    Json,
    extract::{RawQuery, State},
    response::Html,
};

pub async fn index() -> Html<&'static str> {
    Html(render_index())
}

pub async fn get_refs(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.refs.as_slice().to_vec())
}

pub async fn get_datasets(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<DatasetsResponse>, AppError> {
    let view = decode_query(&state, query.as_deref())?;
    let series = load_series(&state.data_dir, &view.ref_id).await?;
    let datasets = compute_datasets(&series, view.download_type, view.granularity);

    // One bound per request, shared by the chart clip and the summary.
    let min = min_date(view.interval);
    let summary = compute_summary(&datasets, min);

    Ok(Json(DatasetsResponse {
        fragment: encode_view_state(&view),
        interval: view.interval.as_string(),
        granularity: view.granularity,
        download_type: view.download_type.as_str().to_string(),
        ref_id: view.ref_id,
        min_date: min,
        datasets,
        summary,
    }))
}

pub async fn get_summary(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<SummaryResponse>, AppError> {
    let view = decode_query(&state, query.as_deref())?;
    let series = load_series(&state.data_dir, &view.ref_id).await?;
    let datasets = compute_datasets(&series, view.download_type, view.granularity);

    let min = min_date(view.interval);
    Ok(Json(SummaryResponse {
        min_date: min,
        summary: compute_summary(&datasets, min),
    }))
}

fn decode_query(state: &AppState, query: Option<&str>) -> Result<ViewState, AppError> {
    decode_view_state(query.unwrap_or(""), &state.refs)
        .ok_or_else(|| AppError::unavailable("no refs loaded"))
}
