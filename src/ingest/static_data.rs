//! Embedded fallback table
//!
//! Compiled into the binary so the dashboard always has something to show.

use crate::error::Result;
use crate::ingest::rows::{normalize_rows, RawRow, StaticRow};
use crate::ingest::types::Stock;
use tracing::debug;

/// CSV snapshot of B3 stocks under R$ 10,00
pub const STATIC_STOCKS_CSV: &str = include_str!("../../data/static_stocks.csv");

/// Parse CSV text with the embedded table's header layout into raw rows.
///
/// Short records are padded with empty fields; records that still fail to
/// decode are skipped.
pub fn parse_static_rows(csv_text: &str) -> Result<Vec<StaticRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let mut record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping unreadable record {}: {}", index + 1, e);
                continue;
            }
        };
        while record.len() < headers.len() {
            record.push_field("");
        }

        match record.deserialize::<StaticRow>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => debug!("Skipping record {}: {}", index + 1, e),
        }
    }
    Ok(rows)
}

/// Normalized rows of `csv_text`, placeholder rows omitted
pub fn parse_static_table(csv_text: &str) -> Result<Vec<Stock>> {
    let rows = parse_static_rows(csv_text)?;
    Ok(normalize_rows(rows.into_iter().map(RawRow::Static), ""))
}

/// Normalized embedded table
pub fn static_stocks() -> Vec<Stock> {
    match parse_static_table(STATIC_STOCKS_CSV) {
        Ok(stocks) => stocks,
        Err(e) => {
            // only reachable if data/static_stocks.csv is malformed
            tracing::error!("Embedded stock table is unreadable: {}", e);
            Vec::new()
        }
    }
}
