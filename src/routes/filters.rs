// Handlers for the filter and search forms. Each one rewrites the submitting
// page's URL and answers with a 303 redirect to it (full page navigation).

use axum::{
    extract::{Form, State},
    http::HeaderMap,
    response::Redirect,
};
use serde::Deserialize;

use super::referer;
use crate::filters::{self, location, FilterCriteria, FilterForm};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyFiltersForm {
    #[serde(flatten)]
    filters: FilterForm,
    search: Option<String>,
    return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearFiltersForm {
    return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    search: String,
    return_to: Option<String>,
}

pub async fn apply_filters(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ApplyFiltersForm>,
) -> Redirect {
    let current =
        location::resolve_current(&app_state.base_url, form.return_to.as_deref(), referer(&headers));
    let criteria = FilterCriteria::from_form(&form.filters, form.search.as_deref());
    tracing::debug!("Applying filters {:?} to {}", criteria, current);

    let next = filters::apply_filters(&current, &criteria);
    Redirect::to(&location::redirect_target(&next))
}

pub async fn clear_all_filters(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ClearFiltersForm>,
) -> Redirect {
    let current =
        location::resolve_current(&app_state.base_url, form.return_to.as_deref(), referer(&headers));
    let next = filters::clear_all_filters(&current);
    tracing::debug!("Cleared filters: {} -> {}", current, next);
    Redirect::to(&location::redirect_target(&next))
}

pub async fn submit_search(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> Redirect {
    let current =
        location::resolve_current(&app_state.base_url, form.return_to.as_deref(), referer(&headers));
    let next = filters::apply_search(&current, &form.search);
    Redirect::to(&location::redirect_target(&next))
}
