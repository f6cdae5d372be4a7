//! Raw source rows and their normalization into [`Stock`]
//!
//! Rows arrive in two shapes:
//! - [`StaticRow`]: flat text fields from the embedded CSV table, in
//!   Brazilian number formatting
//! - [`ApiRow`]: already-typed fields from the JSON feed, where any field may
//!   be missing, `null`, or of the wrong JSON type
//!
//! A row without a ticker or a company name is dropped; every other field
//! problem is absorbed at field level.

use crate::ingest::locale::{parse_currency, parse_number, parse_percentage};
use crate::ingest::types::{Stock, UNKNOWN_SECTOR};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::debug;

// ============================================================================
// Lenient deserializers for the JSON feed
// ============================================================================

/// Keep a value only when it is a JSON number; anything else is absent
fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[allow(dead_code)]
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeNumber {
        Number(f64),
        Other(IgnoredAny),
    }

    Ok(match Option::<MaybeNumber>::deserialize(deserializer)? {
        Some(MaybeNumber::Number(n)) if n.is_finite() => Some(n),
        _ => None,
    })
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[allow(dead_code)]
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeString {
        Str(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<MaybeString>::deserialize(deserializer)? {
        Some(MaybeString::Str(s)) => Some(s),
        _ => None,
    })
}

// ============================================================================
// Source shapes
// ============================================================================

/// One line of the embedded CSV table, keyed by its Portuguese headers
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StaticRow {
    #[serde(rename = "Ticker", default)]
    pub ticker: String,
    #[serde(rename = "Empresa", default)]
    pub company: String,
    #[serde(rename = "Preço Atual (R$)", default)]
    pub price: String,
    #[serde(rename = "Setor", default)]
    pub sector: String,
    #[serde(rename = "Dividend Yield (%)", default)]
    pub dividend_yield: String,
    #[serde(rename = "P/L", default)]
    pub price_earnings: String,
    #[serde(rename = "P/VP", default)]
    pub price_to_book: String,
    #[serde(rename = "Variação 5 Anos (%)", default)]
    pub variation_5y: String,
    #[serde(rename = "Upside Graham (%)", default)]
    pub upside_potential: String,
    #[serde(rename = "Var. Dia (%)", default)]
    pub variation_day: String,
    #[serde(rename = "Var. Semana (%)", default)]
    pub variation_week: String,
    #[serde(rename = "Volume", default)]
    pub volume: String,
    #[serde(rename = "Última Atualização", default)]
    pub last_updated: String,
}

/// One entry of `acoes` in the JSON feed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRow {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub empresa: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub preco: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub setor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub dy: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub pl: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub pvp: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub var5a: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub upside_graham: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub var_dia: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub var_semana: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub ultima_atualizacao: Option<String>,
}

/// Top-level JSON feed document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPayload {
    #[serde(default)]
    pub acoes: Option<Vec<ApiRow>>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub atualizado_em: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub data_referencia: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub fonte: Option<String>,
}

/// A raw row from either source
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    Static(StaticRow),
    Api(ApiRow),
}

// ============================================================================
// Normalization
// ============================================================================

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl StaticRow {
    /// Returns `None` for placeholder rows without ticker or company
    pub fn normalize(self) -> Option<Stock> {
        let ticker = non_blank(Some(self.ticker))?;
        let company = non_blank(Some(self.company))?;

        Some(Stock {
            ticker,
            company,
            price: parse_currency(&self.price),
            sector: non_blank(Some(self.sector)).unwrap_or_else(|| UNKNOWN_SECTOR.to_string()),
            dividend_yield: parse_percentage(&self.dividend_yield),
            price_earnings: parse_number(&self.price_earnings),
            price_to_book: parse_number(&self.price_to_book),
            variation_5y: parse_percentage(&self.variation_5y),
            upside_potential: parse_percentage(&self.upside_potential),
            variation_day: parse_percentage(&self.variation_day),
            variation_week: parse_percentage(&self.variation_week),
            volume: parse_number(&self.volume),
            last_updated: self.last_updated.trim().to_string(),
        })
    }
}

impl ApiRow {
    /// `snapshot_timestamp` stands in for a missing per-row timestamp
    pub fn normalize(self, snapshot_timestamp: &str) -> Option<Stock> {
        let ticker = non_blank(self.ticker)?;
        let company = non_blank(self.empresa).unwrap_or_else(|| ticker.clone());

        Some(Stock {
            ticker,
            company,
            price: self.preco.filter(|p| *p >= 0.0).unwrap_or(0.0),
            sector: non_blank(self.setor).unwrap_or_else(|| UNKNOWN_SECTOR.to_string()),
            dividend_yield: self.dy,
            price_earnings: self.pl,
            price_to_book: self.pvp,
            variation_5y: self.var5a,
            upside_potential: self.upside_graham,
            variation_day: self.var_dia,
            variation_week: self.var_semana,
            volume: self.volume,
            last_updated: self
                .ultima_atualizacao
                .unwrap_or_else(|| snapshot_timestamp.to_string()),
        })
    }
}

impl RawRow {
    pub fn normalize(self, snapshot_timestamp: &str) -> Option<Stock> {
        match self {
            RawRow::Static(row) => row.normalize(),
            RawRow::Api(row) => row.normalize(snapshot_timestamp),
        }
    }
}

/// Normalize rows in source order, omitting rows without identity
pub fn normalize_rows<I>(rows: I, snapshot_timestamp: &str) -> Vec<Stock>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut dropped = 0usize;
    let stocks: Vec<Stock> = rows
        .into_iter()
        .filter_map(|row| {
            let stock = row.normalize(snapshot_timestamp);
            if stock.is_none() {
                dropped += 1;
            }
            stock
        })
        .collect();

    if dropped > 0 {
        debug!("Dropped {} rows without ticker or company", dropped);
    }
    stocks
}

impl ApiPayload {
    /// Normalized rows of the payload; empty when `acoes` is missing
    pub fn into_stocks(self) -> Vec<Stock> {
        let timestamp = self.atualizado_em.unwrap_or_default();
        let rows = self.acoes.unwrap_or_default().into_iter().map(RawRow::Api);
        normalize_rows(rows, &timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn static_row(ticker: &str, company: &str) -> StaticRow {
        StaticRow {
            ticker: ticker.into(),
            company: company.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_static_row_azul() {
        let row = StaticRow {
            price: "R$ 0,81".into(),
            sector: "Bens Industriais".into(),
            variation_5y: "-96,59%".into(),
            variation_week: "0,00%".into(),
            last_updated: "21/02/2026 21:06".into(),
            ..static_row("AZUL4", "Azul S.A.")
        };

        let stock = row.normalize().unwrap();
        assert_eq!(stock.price, 0.81);
        assert_eq!(stock.price_earnings, None);
        assert_eq!(stock.dividend_yield, None);
        assert_eq!(stock.variation_5y, Some(-96.59));
        assert_eq!(stock.variation_day, None);
        assert_eq!(stock.variation_week, Some(0.0));
        assert_eq!(stock.last_updated, "21/02/2026 21:06");
    }

    #[test]
    fn test_static_row_without_company_is_dropped() {
        assert!(static_row("PETZ3", "").normalize().is_none());
        assert!(static_row("PETZ3", "   ").normalize().is_none());
        assert!(static_row("", "Petz").normalize().is_none());
    }

    #[test]
    fn test_static_row_defaults_sector() {
        let stock = static_row("KLBN4", "Klabin").normalize().unwrap();
        assert_eq!(stock.sector, UNKNOWN_SECTOR);
        assert_eq!(stock.price, 0.0);
    }

    #[test]
    fn test_api_row_defaults() {
        let row: ApiRow = serde_json::from_value(json!({
            "ticker": "COGN3",
            "preco": 3.63,
            "pl": "5,70",
            "varDia": 1.11,
            "volume": 34198500
        }))
        .unwrap();

        let stock = row.normalize("2026-02-21T21:06:00").unwrap();
        assert_eq!(stock.company, "COGN3");
        assert_eq!(stock.sector, UNKNOWN_SECTOR);
        assert_eq!(stock.price, 3.63);
        assert_eq!(stock.price_earnings, None);
        assert_eq!(stock.variation_day, Some(1.11));
        assert_eq!(stock.volume, Some(34_198_500.0));
        assert_eq!(stock.last_updated, "2026-02-21T21:06:00");
    }

    #[test]
    fn test_api_row_non_numeric_price_is_zero() {
        let row: ApiRow = serde_json::from_value(json!({
            "ticker": "CASH3",
            "empresa": "Meliuz SA",
            "preco": null,
            "ultimaAtualizacao": "21/02/2026 21:06"
        }))
        .unwrap();

        let stock = row.normalize("ignored").unwrap();
        assert_eq!(stock.price, 0.0);
        assert_eq!(stock.last_updated, "21/02/2026 21:06");
    }

    #[test]
    fn test_api_row_without_ticker_is_dropped() {
        let row: ApiRow = serde_json::from_value(json!({ "empresa": "Ghost" })).unwrap();
        assert!(row.normalize("").is_none());
    }

    #[test]
    fn test_normalize_rows_keeps_order() {
        let rows = vec![
            RawRow::Static(static_row("B", "Bravo")),
            RawRow::Static(static_row("PETZ3", "")),
            RawRow::Static(static_row("A", "Alpha")),
        ];

        let stocks = normalize_rows(rows, "");
        let tickers: Vec<&str> = stocks.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["B", "A"]);
    }

    #[test]
    fn test_payload_without_acoes_is_empty() {
        let payload: ApiPayload =
            serde_json::from_value(json!({ "atualizadoEm": "x", "fonte": "yfinance" })).unwrap();
        assert!(payload.into_stocks().is_empty());
    }
}
