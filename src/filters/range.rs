// Numeric range selections ("min-max" selector values) and their sentinels

/// Upper-bound sentinel for price and kilometre selectors.
pub const UNBOUNDED_AMOUNT: i64 = 999_999_999;
/// Upper-bound sentinel for the year selector.
pub const UNBOUNDED_YEAR: i64 = 9999;

/// The three numeric selectors on the filter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    Price,
    Year,
    Km,
}

impl RangeKind {
    pub const ALL: [RangeKind; 3] = [RangeKind::Price, RangeKind::Year, RangeKind::Km];

    /// Maximum value meaning "no upper bound" for this selector.
    pub fn sentinel(self) -> i64 {
        match self {
            RangeKind::Price | RangeKind::Km => UNBOUNDED_AMOUNT,
            RangeKind::Year => UNBOUNDED_YEAR,
        }
    }

    /// Name of the form field carrying the encoded range.
    pub fn form_field(self) -> &'static str {
        match self {
            RangeKind::Price => "price_range",
            RangeKind::Year => "year_range",
            RangeKind::Km => "km_range",
        }
    }

    pub fn min_param(self) -> &'static str {
        match self {
            RangeKind::Price => "price_min",
            RangeKind::Year => "year_min",
            RangeKind::Km => "km_min",
        }
    }

    pub fn max_param(self) -> &'static str {
        match self {
            RangeKind::Price => "price_max",
            RangeKind::Year => "year_max",
            RangeKind::Km => "km_max",
        }
    }

    /// Preset `(value, label)` options rendered in the selector.
    /// The first entry is the unbounded default.
    pub fn options(self) -> &'static [(&'static str, &'static str)] {
        match self {
            RangeKind::Price => &[
                ("0-999999999", "Cualquier precio"),
                ("0-5000000", "Hasta $5.000.000"),
                ("5000000-10000000", "$5.000.000 - $10.000.000"),
                ("10000000-20000000", "$10.000.000 - $20.000.000"),
                ("20000000-999999999", "Más de $20.000.000"),
            ],
            RangeKind::Year => &[
                ("0-9999", "Cualquier año"),
                ("0-2000", "Hasta 2000"),
                ("2000-2010", "2000 - 2010"),
                ("2010-2018", "2010 - 2018"),
                ("2018-9999", "2018 en adelante"),
            ],
            RangeKind::Km => &[
                ("0-999999999", "Cualquier kilometraje"),
                ("0-50000", "Hasta 50.000 km"),
                ("50000-100000", "50.000 - 100.000 km"),
                ("100000-200000", "100.000 - 200.000 km"),
                ("200000-999999999", "Más de 200.000 km"),
            ],
        }
    }
}

/// A numeric range with sentinel bounds already stripped.
///
/// `None` on either side means "no constraint". Only [`RangeSelection::parse`]
/// and [`RangeSelection::encode`] deal with the `"min-max"` wire string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeSelection {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl RangeSelection {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// Decodes a selector value such as `"100-500"`.
    ///
    /// Only the first two `-` separated pieces are read. An empty piece reads
    /// as zero; any other unparseable piece drops that bound silently, as does
    /// a missing upper piece.
    pub fn parse(kind: RangeKind, raw: &str) -> Self {
        let mut pieces = raw.split('-');
        let min = pieces.next().and_then(parse_bound);
        let max = pieces.next().and_then(parse_bound);

        Self {
            min: min.filter(|m| *m > 0),
            max: max.filter(|m| *m < kind.sentinel()),
        }
    }

    /// Encodes back to the selector value, substituting sentinels for open bounds.
    pub fn encode(&self, kind: RangeKind) -> String {
        format!(
            "{}-{}",
            self.min.unwrap_or(0),
            self.max.unwrap_or_else(|| kind.sentinel())
        )
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Inclusive membership test used by the listing filter.
    pub fn contains(&self, value: i64) -> bool {
        self.min.is_none_or(|m| value >= m) && self.max.is_none_or(|m| value <= m)
    }
}

// Whole decimal integers only: "1.5", "1e3" and "0x10" drop the bound, where a
// browser's Number() would have accepted them.
fn parse_bound(piece: &str) -> Option<i64> {
    let piece = piece.trim();
    if piece.is_empty() {
        return Some(0);
    }
    piece.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bounded_range() {
        let r = RangeSelection::parse(RangeKind::Price, "100-500");
        assert_eq!(r, RangeSelection::new(Some(100), Some(500)));
    }

    #[test]
    fn sentinels_mean_unbounded() {
        assert!(RangeSelection::parse(RangeKind::Price, "0-999999999").is_unbounded());
        assert!(RangeSelection::parse(RangeKind::Km, "0-999999999").is_unbounded());
        assert!(RangeSelection::parse(RangeKind::Year, "0-9999").is_unbounded());
    }

    #[test]
    fn year_sentinel_differs_from_price() {
        let r = RangeSelection::parse(RangeKind::Price, "2018-9999");
        assert_eq!(r, RangeSelection::new(Some(2018), Some(9999)));
        let r = RangeSelection::parse(RangeKind::Year, "2018-9999");
        assert_eq!(r, RangeSelection::new(Some(2018), None));
    }

    #[test]
    fn malformed_halves_are_dropped() {
        assert!(RangeSelection::parse(RangeKind::Price, "abc-def").is_unbounded());
        let r = RangeSelection::parse(RangeKind::Km, "abc-300");
        assert_eq!(r, RangeSelection::new(None, Some(300)));
    }

    #[test]
    fn non_integer_notations_are_dropped() {
        assert!(RangeSelection::parse(RangeKind::Price, "1.5-1e3").is_unbounded());
        let r = RangeSelection::parse(RangeKind::Km, "0x10-5000");
        assert_eq!(r, RangeSelection::new(None, Some(5000)));
    }

    #[test]
    fn missing_upper_piece_is_unbounded() {
        let r = RangeSelection::parse(RangeKind::Price, "250");
        assert_eq!(r, RangeSelection::new(Some(250), None));
    }

    #[test]
    fn empty_piece_reads_as_zero() {
        // "100-" -> upper bound 0, which is below the sentinel
        let r = RangeSelection::parse(RangeKind::Price, "100-");
        assert_eq!(r, RangeSelection::new(Some(100), Some(0)));
        assert!(RangeSelection::parse(RangeKind::Price, "").is_unbounded());
    }

    #[test]
    fn encode_restores_sentinels() {
        let r = RangeSelection::new(Some(2010), None);
        assert_eq!(r.encode(RangeKind::Year), "2010-9999");
        assert_eq!(RangeSelection::default().encode(RangeKind::Km), "0-999999999");
    }

    #[test]
    fn preset_options_round_trip_through_encode() {
        for kind in RangeKind::ALL {
            for (value, _) in kind.options() {
                assert_eq!(RangeSelection::parse(kind, value).encode(kind), *value);
            }
        }
    }

    #[test]
    fn contains_is_inclusive() {
        let r = RangeSelection::new(Some(10), Some(20));
        assert!(r.contains(10));
        assert!(r.contains(20));
        assert!(!r.contains(21));
        assert!(RangeSelection::default().contains(-5));
    }
}
