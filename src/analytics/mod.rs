//! Derived views over a resolved stock list
//!
//! Pure functions: no I/O, inputs are never mutated, and the same input
//! always produces the same output.

mod stats;
mod view;

pub use stats::{compute_stats, SectorCount, StockStats};
pub use view::{filter_and_sort, SortConfig, SortDirection, SortKey};
