// In-memory vehicle catalog (loaded once at startup) and the click log

use anyhow::{Context, Result};
use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    fs,
    path::Path,
};
use tokio::sync::RwLock;

use crate::models::{Click, Vehicle};

#[derive(Debug, Default)]
pub struct Catalog {
    vehicles: Vec<Vehicle>,
}

impl Catalog {
    pub fn new(mut vehicles: Vec<Vehicle>) -> Self {
        vehicles.sort_by_key(|v| v.id);
        Self { vehicles }
    }

    /// Loads the catalog JSON (an array of vehicles). A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Catalog file {} not found, starting with no vehicles.", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let vehicles: Vec<Vehicle> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;

        tracing::info!("Loaded {} vehicles from {}", vehicles.len(), path.display());
        Ok(Self::new(vehicles))
    }

    pub fn get(&self, id: u32) -> Option<&Vehicle> {
        self.vehicles
            .binary_search_by_key(&id, |v| v.id)
            .ok()
            .map(|idx| &self.vehicles[idx])
    }

    pub fn active(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter().filter(|v| v.is_active)
    }

    /// Distinct, sorted, non-empty brands of active vehicles (brand dropdown).
    pub fn brands(&self) -> Vec<String> {
        self.active()
            .filter_map(|v| v.brand.as_deref())
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Default)]
struct ClickLogInner {
    recent: VecDeque<Click>,
    per_vehicle: HashMap<u32, u64>,
}

/// Click log: the latest `capacity` clicks in full, plus running per-vehicle totals.
///
/// Only clicks on catalog vehicles are recorded, so the totals map is bounded by
/// the catalog size.
#[derive(Debug)]
pub struct ClickLog {
    capacity: usize,
    inner: RwLock<ClickLogInner>,
}

impl ClickLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(ClickLogInner::default()),
        }
    }

    pub async fn record(&self, click: Click) {
        tracing::info!(
            vehicle_id = click.vehicle_id,
            click_type = ?click.click_type,
            "Recorded click"
        );
        let mut inner = self.inner.write().await;
        *inner.per_vehicle.entry(click.vehicle_id).or_default() += 1;
        if inner.recent.len() == self.capacity {
            inner.recent.pop_front();
        }
        inner.recent.push_back(click);
    }

    pub async fn count_for(&self, vehicle_id: u32) -> u64 {
        self.inner
            .read()
            .await
            .per_vehicle
            .get(&vehicle_id)
            .copied()
            .unwrap_or(0)
    }
}
