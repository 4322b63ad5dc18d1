// Search-as-you-type suggestions served by GET /api/search

use cached::{Cached, SizedCache};
use serde::Serialize;
use std::sync::Mutex;

use crate::catalog::Catalog;
use crate::models::Vehicle;

const CACHE_SIZE: usize = 256;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Suggestion {
    pub id: u32,
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub price: String,
    pub year: Option<i32>,
    pub kilometers: Option<i64>,
    pub fuel_type: Option<String>,
    pub image: Option<String>,
    pub url: String,
}

impl From<&Vehicle> for Suggestion {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id,
            title: v.title.clone(),
            brand: v.brand.clone(),
            model: v.model.clone(),
            price: v.format_price(),
            year: v.year,
            kilometers: v.kilometers,
            fuel_type: v.fuel_type.clone(),
            image: v.main_image().map(str::to_string),
            url: v.detail_path(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub vehicles: Vec<Suggestion>,
}

/// Memoizes suggestion lists per normalized query. The catalog never changes
/// after startup, so entries are only evicted by size.
pub struct SuggestionIndex {
    limit: usize,
    cache: Mutex<SizedCache<String, Vec<Suggestion>>>,
}

impl SuggestionIndex {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            cache: Mutex::new(SizedCache::with_size(CACHE_SIZE)),
        }
    }

    pub fn suggest(&self, catalog: &Catalog, query: &str) -> Vec<Suggestion> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Vec::new();
        }

        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.cache_get(&key) {
                tracing::debug!("Suggestion cache hit for '{}'", key);
                return hit.clone();
            }
        }

        let found: Vec<Suggestion> = catalog
            .active()
            .filter(|v| v.matches_text(&key))
            .take(self.limit)
            .map(Suggestion::from)
            .collect();

        match self.cache.lock() {
            Ok(mut cache) => {
                cache.cache_set(key, found.clone());
            }
            Err(e) => tracing::warn!("Suggestion cache unavailable: {}", e),
        }
        found
    }
}
