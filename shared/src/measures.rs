//! Measurement normalization
//!
//! Flattens body-measure groups into per-kind sequences of decoded
//! measurements.
//!
//! # Design
//!
//! - The collection always holds a sequence for each of the sixteen kinds,
//!   possibly empty, so callers never have to distinguish "absent" from
//!   "no readings".
//! - Within a kind, measurements keep the order in which their groups (and
//!   the readings inside each group) appeared in the input. No sorting.
//! - Readings whose type code is not recognized are dropped silently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

use crate::dates::epoch_to_datetime;
use crate::models::{MeasType, MeasureCategory};
use crate::types::MeasureGroup;
use crate::units::UnitPreferences;

/// A decoded reading with its group's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub kind: MeasType,
    pub date: DateTime<Utc>,
    /// Value in the kind's canonical unit
    pub value: f64,
    pub attrib: i32,
    pub category: i32,
}

impl Measurement {
    /// Canonical unit symbol of this measurement
    pub fn unit(&self) -> &'static str {
        self.kind.unit()
    }

    pub fn measure_category(&self) -> Option<MeasureCategory> {
        MeasureCategory::from_code(self.category)
    }

    /// Value and unit symbol converted to the preferred display units.
    ///
    /// Only masses, heights and temperatures are affected; every other kind
    /// is returned in its canonical unit.
    pub fn display(&self, prefs: &UnitPreferences) -> (f64, &'static str) {
        match self.kind {
            MeasType::Weight
            | MeasType::FatFreeMass
            | MeasType::FatMassWeight
            | MeasType::MuscleMass
            | MeasType::Hydration
            | MeasType::BoneMass => (
                prefs.weight.from_kg(self.value),
                prefs.weight.abbreviation(),
            ),
            MeasType::Height => (
                prefs.length.from_meters(self.value),
                prefs.length.abbreviation(),
            ),
            MeasType::Temperature | MeasType::BodyTemperature | MeasType::SkinTemperature => (
                prefs.temperature.from_celsius(self.value),
                prefs.temperature.abbreviation(),
            ),
            _ => (self.value, self.unit()),
        }
    }
}

/// Measurements grouped by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementCollection {
    measures: BTreeMap<MeasType, Vec<Measurement>>,
}

impl Default for MeasurementCollection {
    fn default() -> Self {
        Self {
            measures: MeasType::ALL.iter().map(|kind| (*kind, Vec::new())).collect(),
        }
    }
}

impl MeasurementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measurements of one kind, in input order
    pub fn get(&self, kind: MeasType) -> &[Measurement] {
        self.measures
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeasType, &[Measurement])> {
        self.measures
            .iter()
            .map(|(kind, measures)| (*kind, measures.as_slice()))
    }

    /// All measurements, kind by kind
    pub fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.measures.values().flatten()
    }

    /// Total number of measurements across all kinds
    pub fn len(&self) -> usize {
        self.measures.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, measurement: Measurement) {
        self.measures
            .entry(measurement.kind)
            .or_default()
            .push(measurement);
    }
}

impl Index<MeasType> for MeasurementCollection {
    type Output = [Measurement];

    fn index(&self, kind: MeasType) -> &Self::Output {
        self.get(kind)
    }
}

/// Flatten measure groups into a per-kind collection
pub fn normalize(groups: &[MeasureGroup]) -> MeasurementCollection {
    let mut collection = MeasurementCollection::new();

    for group in groups {
        let date = epoch_to_datetime(group.date);
        for measure in &group.measures {
            let Some(kind) = measure.kind() else {
                continue;
            };
            collection.push(Measurement {
                kind,
                date,
                value: measure.decoded(),
                attrib: group.attrib,
                category: group.category,
            });
        }
    }

    collection
}
