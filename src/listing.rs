// Server side of the filter convention: reads the query string back into
// criteria and selects the matching page of vehicles.

use crate::catalog::Catalog;
use crate::filters::{FilterCriteria, RangeKind, RangeSelection};
use crate::models::Vehicle;

/// Listing query string. Everything stays a string so a malformed number is
/// ignored instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub brand: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub location: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub km_min: Option<String>,
    pub km_max: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    /// Builds the query from decoded pairs. A repeated key keeps its first value;
    /// unknown keys are skipped.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut query.search,
                "price_min" => &mut query.price_min,
                "price_max" => &mut query.price_max,
                "brand" => &mut query.brand,
                "year_min" => &mut query.year_min,
                "year_max" => &mut query.year_max,
                "location" => &mut query.location,
                "fuel_type" => &mut query.fuel_type,
                "transmission" => &mut query.transmission,
                "km_min" => &mut query.km_min,
                "km_max" => &mut query.km_max,
                "page" => &mut query.page,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// Bounds are taken as given; sentinel stripping only happens on the form side.
    pub fn criteria(&self) -> FilterCriteria {
        let bounds = |min: &Option<String>, max: &Option<String>| {
            RangeSelection::new(lenient_int(min), lenient_int(max))
        };

        FilterCriteria {
            search: trimmed(&self.search),
            price: bounds(&self.price_min, &self.price_max),
            year: bounds(&self.year_min, &self.year_max),
            km: bounds(&self.km_min, &self.km_max),
            brand: trimmed(&self.brand),
            location: trimmed(&self.location),
            fuel_type: trimmed(&self.fuel_type),
            transmission: trimmed(&self.transmission),
        }
    }

    pub fn page(&self) -> usize {
        lenient_int(&self.page)
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(1)
            .max(1)
    }
}

fn lenient_int(raw: &Option<String>) -> Option<i64> {
    raw.as_deref().and_then(|s| s.trim().parse().ok())
}

fn trimmed(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn matches(vehicle: &Vehicle, criteria: &FilterCriteria) -> bool {
    if let Some(search) = &criteria.search {
        if !vehicle.matches_text(&search.to_lowercase()) {
            return false;
        }
    }

    let in_range = |kind: RangeKind, value: Option<i64>| {
        let range = criteria.range(kind);
        match value {
            Some(value) => range.contains(value),
            None => range.is_unbounded(),
        }
    };
    if !in_range(RangeKind::Price, Some(vehicle.price))
        || !in_range(RangeKind::Year, vehicle.year.map(i64::from))
        || !in_range(RangeKind::Km, vehicle.kilometers)
    {
        return false;
    }

    if let Some(brand) = &criteria.brand {
        let wanted = brand.to_lowercase();
        if !vehicle
            .brand
            .as_deref()
            .is_some_and(|b| b.to_lowercase().contains(&wanted))
        {
            return false;
        }
    }

    // Vehicles carry no location field; sellers put the town in the title.
    if let Some(location) = &criteria.location {
        if !vehicle.title.to_lowercase().contains(&location.to_lowercase()) {
            return false;
        }
    }

    let exact = |wanted: &Option<String>, actual: &Option<String>| match wanted {
        Some(w) => actual.as_deref() == Some(w.as_str()),
        None => true,
    };
    exact(&criteria.fuel_type, &vehicle.fuel_type)
        && exact(&criteria.transmission, &vehicle.transmission)
}

#[derive(Debug)]
pub struct ListingPage<'a> {
    pub vehicles: Vec<&'a Vehicle>,
    pub page: usize,
    pub total_vehicles: usize,
    pub total_pages: usize,
}

impl ListingPage<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn select_page<'a>(
    catalog: &'a Catalog,
    criteria: &FilterCriteria,
    page: usize,
    per_page: usize,
) -> ListingPage<'a> {
    let per_page = per_page.max(1);
    let matching: Vec<&Vehicle> = catalog.active().filter(|v| matches(v, criteria)).collect();
    let total_vehicles = matching.len();
    let total_pages = total_vehicles.div_ceil(per_page);

    let vehicles = matching
        .into_iter()
        .skip(page.saturating_sub(1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    ListingPage {
        vehicles,
        page,
        total_vehicles,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::vehicle;
    use crate::routes::test_support::query_pairs;

    fn query(pairs: &str) -> ListingQuery {
        ListingQuery::from_pairs(query_pairs(pairs))
    }

    fn sample() -> Catalog {
        let mut ranger = vehicle(1, "Ford Ranger Tunuyán", 20_000_000);
        ranger.brand = Some("Ford".into());
        ranger.year = Some(2019);
        ranger.kilometers = Some(80_000);
        ranger.fuel_type = Some("Diesel".into());
        ranger.transmission = Some("Manual".into());

        let mut gol = vehicle(2, "VW Gol San Carlos", 6_000_000);
        gol.brand = Some("Volkswagen".into());
        gol.year = Some(2012);
        gol.kilometers = Some(150_000);
        gol.fuel_type = Some("Nafta".into());

        let mut unknown_year = vehicle(3, "Fiat 600", 2_000_000);
        unknown_year.brand = Some("Fiat".into());

        Catalog::new(vec![ranger, gol, unknown_year])
    }

    fn ids(catalog: &Catalog, q: &str) -> Vec<u32> {
        let q = query(q);
        select_page(catalog, &q.criteria(), q.page(), 10)
            .vehicles
            .iter()
            .map(|v| v.id)
            .collect()
    }

    #[test]
    fn no_filters_lists_everything() {
        assert_eq!(ids(&sample(), ""), vec![1, 2, 3]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let catalog = sample();
        assert_eq!(ids(&catalog, "price_min=6000000&price_max=20000000"), vec![1, 2]);
        assert_eq!(ids(&catalog, "km_max=80000"), vec![1]);
    }

    #[test]
    fn missing_field_fails_bounded_range() {
        assert_eq!(ids(&sample(), "year_min=2000"), vec![1, 2]);
    }

    #[test]
    fn malformed_numbers_are_ignored() {
        assert_eq!(ids(&sample(), "price_min=mucho&page=dos"), vec![1, 2, 3]);
    }

    #[test]
    fn text_and_categorical_filters() {
        let catalog = sample();
        assert_eq!(ids(&catalog, "search=ranger"), vec![1]);
        assert_eq!(ids(&catalog, "brand=volks"), vec![2]);
        assert_eq!(ids(&catalog, "location=san+carlos"), vec![2]);
        assert_eq!(ids(&catalog, "fuel_type=Nafta"), vec![2]);
        assert_eq!(ids(&catalog, "fuel_type=nafta"), Vec::<u32>::new());
        assert_eq!(ids(&catalog, "transmission=Manual&brand=Ford"), vec![1]);
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let q = query("brand=Ford&brand=Fiat&page=2&page=9&utm_source=mail");
        assert_eq!(q.brand.as_deref(), Some("Ford"));
        assert_eq!(q.page(), 2);
        assert_eq!(ids(&sample(), "brand=Ford&brand=Fiat"), vec![1]);
    }

    #[test]
    fn pagination_clamps_and_reports() {
        let vehicles = (1..=23).map(|i| vehicle(i, "Auto", 1)).collect();
        let catalog = Catalog::new(vehicles);
        let criteria = FilterCriteria::default();

        let last = select_page(&catalog, &criteria, 3, 10);
        assert_eq!(last.vehicles.len(), 3);
        assert_eq!(last.total_pages, 3);
        assert!(last.has_prev());
        assert!(!last.has_next());

        assert_eq!(query("page=0").page(), 1);
        assert_eq!(query("page=-4").page(), 1);
        assert!(select_page(&catalog, &criteria, 9, 10).vehicles.is_empty());
    }
}
