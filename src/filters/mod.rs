//! Filter form to query string synchronization.
//!
//! The listing page keeps its whole filter state in the query string. Applying
//! filters rebuilds that state from the submitted form on top of the current
//! URL; clearing strips it again. Both steps are pure `Url -> Url` functions,
//! and the handlers in `routes::filters` turn the result into a redirect.

use serde::Deserialize;
use url::Url;

pub mod location;
pub mod range;

pub use range::{RangeKind, RangeSelection};

/// Every query parameter owned by the filter UI.
pub const FILTER_PARAMS: [&str; 11] = [
    "search",
    "price_min",
    "price_max",
    "brand",
    "year_min",
    "year_max",
    "location",
    "fuel_type",
    "transmission",
    "km_min",
    "km_max",
];

/// Raw values posted by the filter form (plus the separate search box).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterForm {
    pub price_range: Option<String>,
    pub year_range: Option<String>,
    pub km_range: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
}

/// Structured filter selection, rebuilt on every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub price: RangeSelection,
    pub year: RangeSelection,
    pub km: RangeSelection,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
}

impl FilterCriteria {
    pub fn from_form(form: &FilterForm, search: Option<&str>) -> Self {
        let decode = |kind: RangeKind, raw: &Option<String>| {
            raw.as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| RangeSelection::parse(kind, s))
                .unwrap_or_default()
        };

        Self {
            search: non_blank(search).map(|s| s.trim().to_string()),
            price: decode(RangeKind::Price, &form.price_range),
            year: decode(RangeKind::Year, &form.year_range),
            km: decode(RangeKind::Km, &form.km_range),
            brand: non_empty(&form.brand),
            location: non_empty(&form.location),
            fuel_type: non_empty(&form.fuel_type),
            transmission: non_empty(&form.transmission),
        }
    }

    pub fn range(&self, kind: RangeKind) -> &RangeSelection {
        match kind {
            RangeKind::Price => &self.price,
            RangeKind::Year => &self.year,
            RangeKind::Km => &self.km,
        }
    }

    /// Parameters this selection contributes, in the order they are appended.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }

        for kind in RangeKind::ALL {
            let range = self.range(kind);
            if let Some(min) = range.min {
                pairs.push((kind.min_param(), min.to_string()));
            }
            if let Some(max) = range.max {
                pairs.push((kind.max_param(), max.to_string()));
            }
        }

        let categorical = [
            ("brand", &self.brand),
            ("location", &self.location),
            ("fuel_type", &self.fuel_type),
            ("transmission", &self.transmission),
        ];
        for (key, value) in categorical {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        pairs
    }
}

/// Rebuilds the filter parameters of `current` from `criteria`.
///
/// All recognized parameters are dropped first, so nothing from an earlier
/// selection survives. Unrelated parameters and the fragment are kept.
pub fn apply_filters(current: &Url, criteria: &FilterCriteria) -> Url {
    rewrite_query(current, |pairs| {
        strip_filter_params(pairs);
        for (key, value) in criteria.query_pairs() {
            set_param(pairs, key, value);
        }
    })
}

/// Removes every recognized filter parameter from `current`.
pub fn clear_all_filters(current: &Url) -> Url {
    rewrite_query(current, strip_filter_params)
}

/// Search box submission: sets `search` to the trimmed text, or removes it when blank.
pub fn apply_search(current: &Url, search: &str) -> Url {
    rewrite_query(current, |pairs| match non_blank(Some(search)) {
        Some(text) => set_param(pairs, "search", text.trim().to_string()),
        None => pairs.retain(|(k, _)| k != "search"),
    })
}

/// Sets a single non-filter parameter (e.g. `page`), leaving the rest alone.
pub fn with_param(current: &Url, key: &str, value: String) -> Url {
    rewrite_query(current, |pairs| set_param(pairs, key, value))
}

pub fn is_filter_param(key: &str) -> bool {
    FILTER_PARAMS.contains(&key)
}

fn strip_filter_params(pairs: &mut Vec<(String, String)>) {
    pairs.retain(|(k, _)| !is_filter_param(k));
}

// Replaces the first occurrence in place and drops the rest, or appends.
fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: String) {
    match pairs.iter().position(|(k, _)| k == key) {
        Some(idx) => {
            pairs[idx].1 = value;
            let mut seen = 0;
            pairs.retain(|(k, _)| {
                if k != key {
                    return true;
                }
                seen += 1;
                seen == 1
            });
        }
        None => pairs.push((key.to_string(), value)),
    }
}

fn rewrite_query<F>(current: &Url, edit: F) -> Url
where
    F: FnOnce(&mut Vec<(String, String)>),
{
    let mut pairs: Vec<(String, String)> = current
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    edit(&mut pairs);

    let mut next = current.clone();
    if pairs.is_empty() {
        next.set_query(None);
    } else {
        next.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
    next
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
