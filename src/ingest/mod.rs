//! Ingestion pipeline
//!
//! ```text
//! CSV text / JSON body ──> rows (normalize) ──> Vec<Stock> ──> resolver ──> StocksSnapshot
//! ```

pub mod locale;
pub mod resolver;
pub mod rows;
pub mod static_data;
pub mod types;

pub use resolver::{HttpLiveSource, LiveSource, SnapshotFileSource, SourceResolver};
pub use rows::{normalize_rows, ApiPayload, ApiRow, RawRow, StaticRow};
pub use types::{Stock, StocksSnapshot};
