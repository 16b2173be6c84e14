use std::collections::BTreeSet;
use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Column names of the tabular source
// ---------------------------------------------------------------------------

pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_OUTCOME: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";

/// Columns every source must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_SITE, COL_PAYLOAD, COL_OUTCOME, COL_BOOSTER_CATEGORY];

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome. Ordered so that failures sort before successes,
/// mirroring the 0/1 encoding of the source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw `class` cell. Only exact 0 and 1 are accepted.
    pub fn from_class(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Outcome::Failure)
        } else if value == 1.0 {
            Some(Outcome::Success)
        } else {
            None
        }
    }

    /// The 0/1 value used as the scatter y coordinate and for success sums.
    pub fn as_class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Failure => write!(f, "Failure"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub site: String,
    /// Payload mass in kilograms, finite and non-negative.
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

impl LaunchRecord {
    /// Build a record from raw cell values, validating the required fields.
    /// `row` is only used for error reporting.
    pub fn from_raw(
        row: usize,
        site: String,
        payload_mass_kg: f64,
        class: f64,
        booster_category: String,
    ) -> Result<Self, DataError> {
        let site = site.trim().to_string();
        if site.is_empty() {
            return Err(DataError::invalid_row(row, "empty launch site"));
        }
        if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
            return Err(DataError::invalid_row(
                row,
                format!("payload mass {payload_mass_kg} is not a non-negative number"),
            ));
        }
        let outcome = Outcome::from_class(class).ok_or_else(|| {
            DataError::invalid_row(row, format!("class {class} is neither 0 nor 1"))
        })?;

        Ok(LaunchRecord {
            site,
            payload_mass_kg,
            outcome,
            booster_category: booster_category.trim().to_string(),
            flight_number: None,
            booster_version: None,
        })
    }

    pub fn with_flight_number(mut self, flight_number: Option<u32>) -> Self {
        self.flight_number = flight_number;
        self
    }

    pub fn with_booster_version(mut self, booster_version: Option<String>) -> Self {
        self.booster_version = booster_version.filter(|v| !v.trim().is_empty());
        self
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with bounds and distinct values computed once.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    /// Distinct sites in first-appearance order (selector order).
    sites: Vec<String>,
    /// Distinct booster categories, sorted.
    booster_categories: Vec<String>,
    min_payload: f64,
    max_payload: f64,
}

impl Dataset {
    /// Build the derived attributes from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, DataError> {
        let first = records.first().ok_or(DataError::Empty)?;
        let mut min_payload = first.payload_mass_kg;
        let mut max_payload = first.payload_mass_kg;

        let mut sites: Vec<String> = Vec::new();
        let mut seen_sites: BTreeSet<&str> = BTreeSet::new();
        let mut categories: BTreeSet<String> = BTreeSet::new();

        for rec in &records {
            min_payload = min_payload.min(rec.payload_mass_kg);
            max_payload = max_payload.max(rec.payload_mass_kg);
            if seen_sites.insert(rec.site.as_str()) {
                sites.push(rec.site.clone());
            }
            categories.insert(rec.booster_category.clone());
        }

        Ok(Dataset {
            sites,
            booster_categories: categories.into_iter().collect(),
            min_payload,
            max_payload,
            records,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &[String] {
        &self.booster_categories
    }

    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – current UI inputs
// ---------------------------------------------------------------------------

/// The value of the site selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// The selector value sent by the UI: `"ALL"` or a site id.
    pub fn from_value(value: &str) -> Self {
        if value == "ALL" {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SiteSelection::All => "ALL",
            SiteSelection::Site(site) => site,
        }
    }

    /// Whether a record's site passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(selected) => selected == site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Inclusive payload interval with `0 <= low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Build a range, swapping reversed bounds and clamping negatives to zero.
    /// A NaN bound is treated as zero.
    pub fn new(a: f64, b: f64) -> Self {
        let a = if a.is_nan() { 0.0 } else { a.max(0.0) };
        let b = if b.is_nan() { 0.0 } else { b.max(0.0) };
        PayloadRange {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        payload_mass_kg >= self.low && payload_mass_kg <= self.high
    }
}

/// Site + payload range as read from the UI on one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

impl FilterSelection {
    /// The selection shown on first render: every site, the dataset's own payload bounds.
    pub fn initial(dataset: &Dataset) -> Self {
        FilterSelection {
            site: SiteSelection::All,
            payload_range: PayloadRange::new(dataset.min_payload(), dataset.max_payload()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(site: &str, payload: f64, class: f64, category: &str) -> LaunchRecord {
        LaunchRecord::from_raw(0, site.to_string(), payload, class, category.to_string())
            .expect("valid test record")
    }

    /// The three-launch dataset used by the end-to-end scenarios.
    pub(crate) fn scenario_dataset() -> Dataset {
        Dataset::from_records(vec![
            record("A", 2000.0, 1.0, "v1.1"),
            record("A", 5000.0, 0.0, "FT"),
            record("B", 3000.0, 1.0, "FT"),
        ])
        .expect("non-empty dataset")
    }

    #[test]
    fn test_dataset_bounds_and_sites() {
        let ds = scenario_dataset();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.min_payload(), 2000.0);
        assert_eq!(ds.max_payload(), 5000.0);
        assert_eq!(ds.sites(), ["A".to_string(), "B".to_string()]);
        assert_eq!(ds.booster_categories(), ["FT".to_string(), "v1.1".to_string()]);
    }

    #[test]
    fn test_sites_keep_first_appearance_order() {
        let ds = Dataset::from_records(vec![
            record("VAFB SLC-4E", 500.0, 1.0, "FT"),
            record("CCAFS LC-40", 600.0, 0.0, "v1.0"),
            record("VAFB SLC-4E", 700.0, 1.0, "FT"),
        ])
        .unwrap();
        assert_eq!(ds.sites(), ["VAFB SLC-4E".to_string(), "CCAFS LC-40".to_string()]);
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert_eq!(Dataset::from_records(Vec::new()).unwrap_err(), DataError::Empty);
    }

    #[test]
    fn test_record_validation() {
        let bad_class = LaunchRecord::from_raw(7, "A".into(), 100.0, 2.0, "FT".into());
        assert!(matches!(bad_class, Err(DataError::InvalidRow { row: 7, .. })));

        let negative = LaunchRecord::from_raw(1, "A".into(), -1.0, 1.0, "FT".into());
        assert!(negative.is_err());

        let blank_site = LaunchRecord::from_raw(2, "  ".into(), 1.0, 1.0, "FT".into());
        assert!(blank_site.is_err());

        let ok = LaunchRecord::from_raw(3, " A ".into(), 0.0, 0.0, "FT".into()).unwrap();
        assert_eq!(ok.site, "A");
        assert_eq!(ok.outcome, Outcome::Failure);
    }

    #[test]
    fn test_payload_range_normalises() {
        let r = PayloadRange::new(9000.0, 1000.0);
        assert_eq!((r.low(), r.high()), (1000.0, 9000.0));

        let r = PayloadRange::new(-50.0, 10.0);
        assert_eq!((r.low(), r.high()), (0.0, 10.0));

        let r = PayloadRange::new(4000.0, 4000.0);
        assert!(r.contains(4000.0));
        assert!(!r.contains(4000.5));
    }

    #[test]
    fn test_site_selection_values() {
        assert_eq!(SiteSelection::from_value("ALL"), SiteSelection::All);
        assert_eq!(
            SiteSelection::from_value("KSC LC-39A"),
            SiteSelection::Site("KSC LC-39A".into())
        );
        assert!(SiteSelection::All.matches("anything"));
        assert!(!SiteSelection::Site("A".into()).matches("B"));
        assert_eq!(SiteSelection::Site("A".into()).to_string(), "A");
    }

    #[test]
    fn test_initial_selection_uses_dataset_bounds() {
        let sel = FilterSelection::initial(&scenario_dataset());
        assert_eq!(sel.site, SiteSelection::All);
        assert_eq!(sel.payload_range, PayloadRange::new(2000.0, 5000.0));
    }
}
