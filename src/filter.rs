//! Region, authority and school type filtering.

use crate::catalog::unique_in_order;
use crate::data::SchoolRecord;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fmt;

/// Region selector value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionChoice {
    #[default]
    All,
    Named(String),
}

impl RegionChoice {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn matches(&self, region: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == region,
        }
    }
}

impl fmt::Display for RegionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Multi-select value: the "All" sentinel plus any explicit values.
///
/// With `all` set every value matches. Without it only the listed values
/// match, so an empty pick matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picks {
    pub all: bool,
    pub values: BTreeSet<String>,
}

impl Default for Picks {
    fn default() -> Self {
        Self::all()
    }
}

impl Picks {
    pub fn all() -> Self {
        Self {
            all: true,
            values: BTreeSet::new(),
        }
    }

    pub fn none() -> Self {
        Self {
            all: false,
            values: BTreeSet::new(),
        }
    }

    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all: false,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.all || self.values.contains(value)
    }

    pub fn contains_any<'a>(&self, mut values: impl Iterator<Item = &'a str>) -> bool {
        self.all || values.any(|v| self.values.contains(v))
    }

    pub fn toggle_all(&mut self) {
        self.all = !self.all;
    }

    pub fn toggle(&mut self, value: &str) {
        if !self.values.remove(value) {
            self.values.insert(value.to_string());
        }
    }

    /// Drop explicit values that are not among `options`
    pub fn retain_options(&mut self, options: &[String]) {
        self.values.retain(|v| options.iter().any(|o| o == v));
    }
}

/// Current region, authority and type selections
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub region: RegionChoice,
    pub authorities: Picks,
    pub types: Picks,
}

impl FilterSelection {
    pub fn matches_region(&self, record: &SchoolRecord) -> bool {
        self.region.matches(&record.region)
    }

    pub fn matches_authority(&self, record: &SchoolRecord) -> bool {
        self.authorities.contains(&record.authority)
    }

    pub fn matches_type(&self, record: &SchoolRecord) -> bool {
        self.types.contains_any(record.type_values())
    }

    /// Region, then authority, then type
    pub fn matches(&self, record: &SchoolRecord) -> bool {
        self.matches_region(record) && self.matches_authority(record) && self.matches_type(record)
    }
}

/// Records passing every filter of `selection`, in dataset order
pub fn filter<'a>(
    records: &'a [SchoolRecord],
    selection: &FilterSelection,
) -> Vec<&'a SchoolRecord> {
    records.par_iter().filter(|r| selection.matches(r)).collect()
}

/// Authorities offered for a region: distinct values within that region, first-seen order
pub fn authority_options(records: &[SchoolRecord], region: &RegionChoice) -> Vec<String> {
    unique_in_order(
        records
            .iter()
            .filter(|r| region.matches(&r.region))
            .map(|r| r.authority.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;

    fn school(name: &str, authority: &str, region: &str, types: &[Option<&str>]) -> SchoolRecord {
        SchoolRecord {
            name: name.to_string(),
            authority: authority.to_string(),
            region: region.to_string(),
            coordinates: LatLon::new(50.0, 15.0),
            types: types.iter().map(|t| t.map(str::to_string)).collect(),
        }
    }

    fn sample() -> Vec<SchoolRecord> {
        vec![
            school("a1", "obec", "A", &[Some("ZŠ"), None]),
            school("a2", "kraj", "A", &[Some("MŠ"), Some("ŠJ")]),
            school("b1", "obec", "B", &[None, Some("ŠJ")]),
        ]
    }

    fn names(records: &[&SchoolRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_all_selection_is_identity() {
        let records = sample();
        let result = filter(&records, &FilterSelection::default());
        let expected: Vec<&SchoolRecord> = records.iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_region_filter() {
        let records = sample();
        let selection = FilterSelection {
            region: RegionChoice::named("A"),
            ..Default::default()
        };
        assert_eq!(names(&filter(&records, &selection)), vec!["a1", "a2"]);
    }

    #[test]
    fn test_authority_filter() {
        let records = sample();
        let selection = FilterSelection {
            authorities: Picks::of(["obec"]),
            ..Default::default()
        };
        assert_eq!(names(&filter(&records, &selection)), vec!["a1", "b1"]);
    }

    #[test]
    fn test_unknown_authority_matches_nothing() {
        let records = sample();
        let selection = FilterSelection {
            authorities: Picks::of(["X"]),
            ..Default::default()
        };
        assert!(filter(&records, &selection).is_empty());
    }

    #[test]
    fn test_type_filter_any_column() {
        let records = sample();
        let selection = FilterSelection {
            types: Picks::of(["ŠJ"]),
            ..Default::default()
        };
        assert_eq!(names(&filter(&records, &selection)), vec!["a2", "b1"]);
    }

    #[test]
    fn test_empty_picks_match_nothing() {
        let records = sample();
        let selection = FilterSelection {
            types: Picks::none(),
            ..Default::default()
        };
        assert!(filter(&records, &selection).is_empty());

        let selection = FilterSelection {
            authorities: Picks::none(),
            ..Default::default()
        };
        assert!(filter(&records, &selection).is_empty());
    }

    #[test]
    fn test_all_sentinel_wins_over_values() {
        let records = sample();
        let mut picks = Picks::of(["X"]);
        picks.toggle_all();
        let selection = FilterSelection {
            authorities: picks,
            ..Default::default()
        };
        assert_eq!(filter(&records, &selection).len(), 3);
    }

    #[test]
    fn test_filters_compose() {
        let records = sample();
        let selection = FilterSelection {
            region: RegionChoice::named("A"),
            authorities: Picks::of(["obec", "kraj"]),
            types: Picks::of(["ZŠ"]),
        };
        assert_eq!(names(&filter(&records, &selection)), vec!["a1"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let selection = FilterSelection {
            region: RegionChoice::named("A"),
            authorities: Picks::all(),
            types: Picks::of(["ZŠ", "MŠ"]),
        };
        let once: Vec<SchoolRecord> = filter(&records, &selection).into_iter().cloned().collect();
        let twice: Vec<SchoolRecord> = filter(&once, &selection).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_authority_options_scoped_to_region() {
        let records = sample();
        assert_eq!(authority_options(&records, &RegionChoice::All), vec!["obec", "kraj"]);
        assert_eq!(authority_options(&records, &RegionChoice::named("B")), vec!["obec"]);
        assert!(authority_options(&records, &RegionChoice::named("Z")).is_empty());
    }

    #[test]
    fn test_toggle_and_retain() {
        let mut picks = Picks::none();
        picks.toggle("obec");
        picks.toggle("kraj");
        picks.toggle("obec");
        assert_eq!(picks, Picks::of(["kraj"]));

        picks.retain_options(&["obec".to_string()]);
        assert!(picks.values.is_empty());
        assert!(!picks.all);
    }
}
