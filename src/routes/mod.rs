// Route definitions

use axum::{
    http::{header, HeaderMap},
    routing::{get, post},
    Router,
};

use crate::AppState;

mod api;
mod filters;
mod listing;
mod offers;

pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/search", get(api::search_suggestions))
        .with_state(app_state.clone());

    Router::new()
        .route("/", get(listing::index))
        .route("/vehicle/:id", get(listing::vehicle_detail))
        // Filter/search forms post here and get redirected back with a rewritten query string
        .route("/filters/apply", post(filters::apply_filters))
        .route("/filters/clear", post(filters::clear_all_filters))
        .route("/search", post(filters::submit_search))
        .route("/offers", post(offers::submit_offer))
        .route("/track_click/:vehicle_id/:click_type", get(offers::track_click))
        .nest("/api", api_router)
        .with_state(app_state)
}

fn referer(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::REFERER).and_then(|v| v.to_str().ok())
}
