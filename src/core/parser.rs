//! CSV reader for meter exports
//!
//! The header is checked once for the required columns; after that every row is
//! either turned into a `ParsedReading` or dropped and counted. Header names
//! must match exactly, only field values are trimmed.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

use crate::consts::{CONSUMPTION_COLUMN, COST_COLUMN, REQUIRED_COLUMNS, TIMESTAMP_COLUMN};
use crate::core::types::{LoadResult, ParsedReading, Reading};
use crate::error::AppError;
use crate::utils::parse_timestamp;

/// How to read a meter export
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParseOptions {
    pub(crate) delimiter: u8,
    /// Read `01/02/2024` as February 1st instead of January 2nd
    pub(crate) day_first: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            delimiter: b',',
            day_first: false,
        }
    }
}

/// Positions of the required columns in the header
#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: usize,
    consumption: usize,
    cost: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, AppError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        match (
            position(TIMESTAMP_COLUMN),
            position(CONSUMPTION_COLUMN),
            position(COST_COLUMN),
        ) {
            (Some(timestamp), Some(consumption), Some(cost)) => Ok(Columns {
                timestamp,
                consumption,
                cost,
            }),
            _ => Err(AppError::Schema {
                missing: REQUIRED_COLUMNS
                    .into_iter()
                    .filter(|&name| position(name).is_none())
                    .map(String::from)
                    .collect(),
            }),
        }
    }

    fn read(&self, record: &StringRecord, day_first: bool) -> Option<Reading> {
        let timestamp = parse_timestamp(record.get(self.timestamp)?, day_first)?;
        let consumption_kwh = optional_amount(record.get(self.consumption))?;
        let total_cost = optional_amount(record.get(self.cost))?.unwrap_or(0.0);
        Some(Reading {
            timestamp,
            consumption_kwh,
            total_cost,
        })
    }
}

/// Parse a numeric cell, accepting a single decimal comma
fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replacen(',', ".", 1).parse::<f64>().ok())?;
    value.is_finite().then_some(value)
}

/// `Some(None)` for an empty or absent cell, `None` when the cell holds something unparseable
fn optional_amount(cell: Option<&str>) -> Option<Option<f64>> {
    match cell.map(str::trim) {
        None | Some("") => Some(None),
        Some(raw) => parse_amount(raw).map(Some),
    }
}

/// Read every row of a meter export.
///
/// Fails only when the header cannot be read or lacks a required column;
/// rows with an unparseable timestamp or amount are skipped.
pub(crate) fn parse_readings<R: Read>(
    input: R,
    options: ParseOptions,
) -> Result<LoadResult, AppError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Fields)
        .from_reader(input);

    let columns = Columns::locate(reader.headers()?)?;
    let mut result = LoadResult::default();

    for (index, record) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(line, error = %e, "skipping unreadable row");
                result.skipped += 1;
                continue;
            }
        };
        match columns.read(&record, options.day_first) {
            Some(reading) => result.readings.push(ParsedReading::from(reading)),
            None => {
                tracing::debug!(line, row = ?record, "skipping row with invalid timestamp or amount");
                result.skipped += 1;
            }
        }
    }

    tracing::debug!(
        readings = result.readings.len(),
        skipped = result.skipped,
        "parsed input"
    );
    Ok(result)
}
