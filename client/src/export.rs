//! CSV export of normalized measurements

use nokia_health_shared::MeasurementCollection;
use serde::Serialize;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Serialize)]
struct MeasurementRow<'a> {
    kind: &'a str,
    date: String,
    value: f64,
    unit: &'a str,
    attrib: i32,
    category: i32,
}

/// One row per measurement, kinds in code order, input order within a kind
pub fn measurements_to_csv(collection: &MeasurementCollection) -> ClientResult<String> {
    let rows: Vec<MeasurementRow<'_>> = collection
        .measurements()
        .map(|m| MeasurementRow {
            kind: m.kind.description(),
            date: m.date.to_rfc3339(),
            value: m.value,
            unit: m.unit(),
            attrib: m.attrib,
            category: m.category,
        })
        .collect();

    to_csv(&rows)
}

fn to_csv<T: Serialize>(data: &[T]) -> ClientResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| ClientError::Export(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ClientError::Export(format!("CSV flush error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ClientError::Export(format!("CSV encoding error: {}", e)))
}
