use axum::extract::State;
use axum::Json;
use errmap_core::EntrySummary;

use crate::state::AppState;

/// GET /api/errors — every error code a client can receive, in catalog order.
pub async fn list_errors(State(app): State<AppState>) -> Json<Vec<EntrySummary>> {
    Json(app.mapper.catalog().summaries())
}
