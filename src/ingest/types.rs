//! Canonical stock records and snapshots

use serde::{Deserialize, Serialize};

/// Sector used when a source row carries none
pub const UNKNOWN_SECTOR: &str = "N/A";

/// One traded ticker, normalized from either source shape.
///
/// Optional fields keep "no data" distinct from zero and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub ticker: String,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "setor")]
    pub sector: String,
    #[serde(rename = "dy")]
    pub dividend_yield: Option<f64>,
    #[serde(rename = "pl")]
    pub price_earnings: Option<f64>,
    #[serde(rename = "pvp")]
    pub price_to_book: Option<f64>,
    #[serde(rename = "var5a")]
    pub variation_5y: Option<f64>,
    #[serde(rename = "upsideGraham")]
    pub upside_potential: Option<f64>,
    #[serde(rename = "varDia")]
    pub variation_day: Option<f64>,
    #[serde(rename = "varSemana")]
    pub variation_week: Option<f64>,
    pub volume: Option<f64>,
    #[serde(rename = "ultimaAtualizacao")]
    pub last_updated: String,
}

/// Result of one ingestion. Never mutated; a refresh builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StocksSnapshot {
    /// Source order, not sorted
    pub stocks: Vec<Stock>,
    pub last_update: String,
    pub reference_date: String,
    pub source_label: String,
    pub is_live: bool,
}

impl StocksSnapshot {
    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}
