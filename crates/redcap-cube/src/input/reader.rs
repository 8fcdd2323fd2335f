//! CSV readers for the compiler inputs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{CubeError, Result};
use super::records::ObservationRow;

/// Apply the missing-input policy: an unset or nonexistent path is logged
/// and yields `None`, so the calling pass becomes a no-op.
pub fn available<'a>(path: Option<&'a Path>, what: &str) -> Option<&'a Path> {
    match path {
        None => {
            log::info!("{what} file not provided");
            None
        }
        Some(path) if !path.is_file() => {
            log::warn!("{} file not found: {}", what, path.display());
            None
        }
        Some(path) => Some(path),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| CubeError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn reader_for<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

/// Deserialize every row of a headed CSV file into `T`.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    parse_records(open(path)?)
}

pub fn parse_records<T: DeserializeOwned, R: Read>(input: R) -> Result<Vec<T>> {
    let mut reader = reader_for(input);
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Read observation rows, keeping column order.
pub fn read_observations(path: &Path) -> Result<Vec<ObservationRow>> {
    parse_observations(open(path)?)
}

pub fn parse_observations<R: Read>(input: R) -> Result<Vec<ObservationRow>> {
    let mut reader = reader_for(input);
    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Short rows are padded with empty values, extra cells dropped.
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
