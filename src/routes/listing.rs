// Listing page: vehicles filtered by the query string, with the filter form
// rendered from that same query string.

use askama::Template;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{Html, IntoResponse},
};

use crate::{
    error::AppError,
    filters::{self, location, FilterCriteria, RangeKind, RangeSelection},
    listing::{self, ListingQuery},
    models::Vehicle,
    AppState,
};

const LOCATIONS: [&str; 3] = ["Tunuyán", "Tupungato", "San Carlos"];
const FUEL_TYPES: [&str; 5] = ["Nafta", "Diesel", "GNC", "Eléctrico", "Híbrido"];
const TRANSMISSIONS: [&str; 2] = ["Manual", "Automática"];

struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

struct RangeSelect {
    id: &'static str,
    name: &'static str,
    options: Vec<SelectOption>,
}

struct VehicleCard {
    title: String,
    price: String,
    year: String,
    kilometers: String,
    fuel_type: String,
    image: Option<String>,
    detail_url: String,
    id: u32,
}

impl From<&Vehicle> for VehicleCard {
    fn from(v: &Vehicle) -> Self {
        Self {
            title: v.title.clone(),
            price: v.format_price(),
            year: v.year.map(|y| y.to_string()).unwrap_or_default(),
            kilometers: v
                .kilometers
                .map(|km| format!("{} km", crate::models::group_thousands(km)))
                .unwrap_or_default(),
            fuel_type: v.fuel_type.clone().unwrap_or_default(),
            image: v.main_image().map(str::to_string),
            detail_url: v.detail_path(),
            id: v.id,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    vehicles: Vec<VehicleCard>,
    search: String,
    return_to: String,
    ranges: Vec<RangeSelect>,
    brands: Vec<SelectOption>,
    locations: Vec<SelectOption>,
    fuel_types: Vec<SelectOption>,
    transmissions: Vec<SelectOption>,
    total_vehicles: usize,
    page: usize,
    total_pages: usize,
    prev_url: Option<String>,
    next_url: Option<String>,
}

// GET /
pub async fn index(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    // A repeated key keeps its first value instead of failing extraction
    let query = ListingQuery::from_pairs(pairs);
    let criteria = query.criteria();
    let page = listing::select_page(
        &app_state.catalog,
        &criteria,
        query.page(),
        app_state.settings.per_page,
    );
    tracing::info!(
        "Listing page {} of {} ({} matching vehicles)",
        page.page,
        page.total_pages,
        page.total_vehicles
    );

    let return_to = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let current = location::resolve_current(&app_state.base_url, Some(&return_to), None);
    let page_url = |n: usize| {
        location::redirect_target(&filters::with_param(&current, "page", n.to_string()))
    };

    let template = IndexTemplate {
        vehicles: page.vehicles.iter().copied().map(VehicleCard::from).collect(),
        search: criteria.search.clone().unwrap_or_default(),
        ranges: RangeKind::ALL
            .into_iter()
            .map(|kind| range_select(kind, &criteria))
            .collect(),
        brands: categorical_options(
            app_state.catalog.brands().iter().map(String::as_str),
            criteria.brand.as_deref(),
            "Todas las marcas",
        ),
        locations: categorical_options(LOCATIONS, criteria.location.as_deref(), "Todas las ubicaciones"),
        fuel_types: categorical_options(FUEL_TYPES, criteria.fuel_type.as_deref(), "Todos los combustibles"),
        transmissions: categorical_options(
            TRANSMISSIONS,
            criteria.transmission.as_deref(),
            "Todas las transmisiones",
        ),
        total_vehicles: page.total_vehicles,
        page: page.page,
        total_pages: page.total_pages,
        prev_url: page.has_prev().then(|| page_url(page.page - 1)),
        next_url: page.has_next().then(|| page_url(page.page + 1)),
        return_to,
    };

    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render listing template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

#[derive(Template)]
#[template(path = "vehicle_detail.html")]
struct VehicleDetailTemplate {
    id: u32,
    title: String,
    price: String,
    description: String,
    image: Option<String>,
    has_whatsapp: bool,
}

// GET /vehicle/:id
pub async fn vehicle_detail(
    State(app_state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state
        .catalog
        .get(id)
        .filter(|v| v.is_active)
        .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))?;

    let template = VehicleDetailTemplate {
        id: vehicle.id,
        title: vehicle.title.clone(),
        price: vehicle.format_price(),
        description: vehicle.description.clone(),
        image: vehicle.main_image().map(str::to_string),
        has_whatsapp: vehicle.whatsapp_number.as_deref().is_some_and(|n| !n.trim().is_empty()),
    };
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render vehicle template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

fn range_select(kind: RangeKind, criteria: &FilterCriteria) -> RangeSelect {
    // Compare on the form's view of the range, where sentinel bounds are open
    let current = RangeSelection::parse(kind, &criteria.range(kind).encode(kind));
    let options = kind
        .options()
        .iter()
        .map(|(value, label)| SelectOption {
            value: value.to_string(),
            label: label.to_string(),
            selected: RangeSelection::parse(kind, value) == current,
        })
        .collect();

    let id = match kind {
        RangeKind::Price => "priceRange",
        RangeKind::Year => "yearRange",
        RangeKind::Km => "kmRange",
    };
    RangeSelect {
        id,
        name: kind.form_field(),
        options,
    }
}

/// Options for a categorical select: an "any" entry, then the known values.
/// A selected value missing from the known list is still offered so the form
/// reflects the URL.
fn categorical_options<'a>(
    values: impl IntoIterator<Item = &'a str>,
    current: Option<&str>,
    any_label: &str,
) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: String::new(),
        label: any_label.to_string(),
        selected: current.is_none(),
    }];
    let mut found = false;
    for value in values {
        let selected = current == Some(value);
        found |= selected;
        options.push(SelectOption {
            value: value.to_string(),
            label: value.to_string(),
            selected,
        });
    }
    if let (Some(current), false) = (current, found) {
        options.push(SelectOption {
            value: current.to_string(),
            label: current.to_string(),
            selected: true,
        });
    }
    options
}
