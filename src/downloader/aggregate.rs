//! Date-ordered collection of daily mileage

use crate::Measurement;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Mapping from calendar day to mileage in kilometers.
///
/// Keys are unique; inserting an existing date overwrites it. Iteration is
/// always in ascending date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    entries: BTreeMap<NaiveDate, f64>,
}

impl Aggregate {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement, returning the previous value for that date
    pub fn insert(&mut self, measurement: Measurement) -> Option<f64> {
        self.entries.insert(measurement.date, measurement.mileage_km)
    }

    /// Mileage recorded for `date`
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.entries.get(&date).copied()
    }

    /// Number of distinct days
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no day has data
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows in ascending date order
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.entries.iter().map(|(date, km)| (*date, *km))
    }

    /// First and last day with data
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.entries.keys().next()?;
        let last = self.entries.keys().next_back()?;
        Some((*first, *last))
    }
}

impl FromIterator<Measurement> for Aggregate {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        let mut aggregate = Aggregate::new();
        for measurement in iter {
            aggregate.insert(measurement);
        }
        aggregate
    }
}
