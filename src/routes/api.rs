// Handlers for backend API endpoints

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::{suggest::SuggestionResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    q: Option<String>,
}

pub async fn search_suggestions(
    State(app_state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Json<SuggestionResponse> {
    let q = query.q.unwrap_or_default();
    let vehicles = app_state.suggestions.suggest(&app_state.catalog, &q);
    tracing::debug!("[HANDLER] /api/search - {} suggestions for '{}'", vehicles.len(), q.trim());
    Json(SuggestionResponse { vehicles })
}
