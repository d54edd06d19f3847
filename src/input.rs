//! Loading measured series from JSON records.

use crate::domain::TimeSeries;
use crate::error::{Result, SynthError};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct Record {
    timestamp: NaiveDateTime,
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

/// Reads a JSON array of `{ "timestamp": "YYYY-MM-DDTHH:MM:SS", "<column>": number }` records
/// into a single-column series. `null` values become `NaN`.
pub fn read_series<R: Read>(reader: R, column: &str) -> Result<TimeSeries> {
    let records: Vec<Record> = serde_json::from_reader(reader)
        .map_err(|e| SynthError::malformed_input(format!("invalid input records: {e}")))?;

    let mut timestamps = Vec::with_capacity(records.len());
    let mut values = Vec::with_capacity(records.len());
    for record in records {
        let value = match record.values.get(column) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(Value::Null) => f64::NAN,
            Some(other) => {
                return Err(SynthError::malformed_input(format!(
                    "'{column}' at {} is not a number: {other}",
                    record.timestamp
                )))
            }
            None => {
                return Err(SynthError::invalid_argument(format!(
                    "record at {} has no column '{column}'",
                    record.timestamp
                )))
            }
        };
        timestamps.push(record.timestamp);
        values.push(value);
    }

    TimeSeries::new(timestamps)?.with_column(column, values)
}
