//! Persisted snapshot codec
//!
//! The snapshot is a JSON array of exactly N records `{ "text", "image" }`.
//! An unsigned slot is written with an empty `image`. Older snapshots wrap
//! each record in a one-element row array; those are still accepted on
//! decode, but encode always writes the flat form.

use crate::error::RosterError;
use crate::roster::Roster;
use crate::slot::{ImageData, Slot};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize)]
struct RecordRef<'a> {
    text: &'a str,
    image: &'a str,
}

/// One `{ "text", "image" }` record; only a JSON object is accepted
#[derive(Deserialize)]
#[serde(try_from = "Map<String, Value>")]
struct StoredRecord {
    text: Option<String>,
    image: Option<String>,
}

impl TryFrom<Map<String, Value>> for StoredRecord {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            text: optional_string(&mut fields, "text")?,
            image: optional_string(&mut fields, "image")?,
        })
    }
}

fn optional_string(fields: &mut Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(format!("`{key}` must be a string, found {other}")),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRow {
    Legacy(Vec<StoredRecord>),
    Record(StoredRecord),
}

/// Encode a roster as its persisted JSON snapshot
///
/// # Errors
/// Returns [`RosterError::Encode`] if serialization fails
pub fn encode_snapshot(roster: &Roster) -> Result<String, RosterError> {
    let records: Vec<RecordRef<'_>> = roster
        .slots()
        .iter()
        .map(|slot| RecordRef {
            text: slot.text(),
            image: slot.image().map_or("", ImageData::as_str),
        })
        .collect();
    serde_json::to_string(&records).map_err(RosterError::Encode)
}

/// Decode a persisted snapshot, requiring exactly `expected_len` slots
///
/// # Errors
/// Returns [`RosterError::CorruptState`] if the blob is not a snapshot array,
/// has the wrong length, or contains a legacy row that is not a single cell.
pub fn decode_snapshot(blob: &str, expected_len: usize) -> Result<Roster, RosterError> {
    let rows: Vec<StoredRow> = serde_json::from_str(blob)
        .map_err(|e| RosterError::corrupt(format!("undecodable snapshot: {e}")))?;

    if rows.len() != expected_len {
        return Err(RosterError::corrupt(format!(
            "expected {expected_len} slots, found {}",
            rows.len()
        )));
    }

    let slots = rows
        .into_iter()
        .enumerate()
        .map(|(position, row)| {
            let record = match row {
                StoredRow::Record(record) => record,
                StoredRow::Legacy(cells) => single_cell(position, cells)?,
            };
            Ok(into_slot(record))
        })
        .collect::<Result<Vec<_>, RosterError>>()?;

    Ok(Roster::from_slots(slots))
}

fn single_cell(position: usize, cells: Vec<StoredRecord>) -> Result<StoredRecord, RosterError> {
    let count = cells.len();
    <[StoredRecord; 1]>::try_from(cells)
        .map(|[record]| record)
        .map_err(|_| RosterError::corrupt(format!("row {position} has {count} cells, expected 1")))
}

fn into_slot(record: StoredRecord) -> Slot {
    let image = record.image.and_then(|data| ImageData::new(data).ok());
    Slot::from_parts(record.text.unwrap_or_default(), image)
}
