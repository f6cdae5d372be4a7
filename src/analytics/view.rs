//! Search filter and column sort for the stock table

use crate::error::AppError;
use crate::ingest::types::Stock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "ticker")]
    Ticker,
    #[serde(rename = "empresa")]
    Company,
    #[serde(rename = "preco")]
    Price,
    #[serde(rename = "setor")]
    Sector,
    #[serde(rename = "dy")]
    DividendYield,
    #[serde(rename = "pl")]
    PriceEarnings,
    #[serde(rename = "pvp")]
    PriceToBook,
    #[serde(rename = "var5a")]
    Variation5y,
    #[serde(rename = "upsideGraham")]
    UpsidePotential,
    #[serde(rename = "varDia")]
    VariationDay,
    #[serde(rename = "varSemana")]
    VariationWeek,
    #[serde(rename = "volume")]
    Volume,
    #[serde(rename = "ultimaAtualizacao")]
    LastUpdated,
}

impl FromStr for SortKey {
    type Err = AppError;

    /// Accepts the feed's field names and the snake_case field names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "ticker" => SortKey::Ticker,
            "empresa" | "company" => SortKey::Company,
            "preco" | "price" => SortKey::Price,
            "setor" | "sector" => SortKey::Sector,
            "dy" | "dividend_yield" => SortKey::DividendYield,
            "pl" | "price_earnings" => SortKey::PriceEarnings,
            "pvp" | "price_to_book" => SortKey::PriceToBook,
            "var5a" | "variation_5y" => SortKey::Variation5y,
            "upsideGraham" | "upside_potential" => SortKey::UpsidePotential,
            "varDia" | "variation_day" => SortKey::VariationDay,
            "varSemana" | "variation_week" => SortKey::VariationWeek,
            "volume" => SortKey::Volume,
            "ultimaAtualizacao" | "last_updated" => SortKey::LastUpdated,
            other => return Err(AppError::Validation(format!("Unknown sort key: {}", other))),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AppError::Validation(format!("Unknown sort direction: {}", other))),
        }
    }
}

/// Column and direction currently applied to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::VariationDay,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    /// Header click: ascending on a new column, flips to descending on a second click
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { key, direction }
    }
}

enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            // a key never mixes kinds
            _ => Ordering::Equal,
        }
    }
}

fn sort_value(stock: &Stock, key: SortKey) -> Option<SortValue<'_>> {
    match key {
        SortKey::Ticker => Some(SortValue::Text(&stock.ticker)),
        SortKey::Company => Some(SortValue::Text(&stock.company)),
        SortKey::Sector => Some(SortValue::Text(&stock.sector)),
        SortKey::LastUpdated => Some(SortValue::Text(&stock.last_updated)),
        SortKey::Price => Some(SortValue::Number(stock.price)),
        SortKey::DividendYield => stock.dividend_yield.map(SortValue::Number),
        SortKey::PriceEarnings => stock.price_earnings.map(SortValue::Number),
        SortKey::PriceToBook => stock.price_to_book.map(SortValue::Number),
        SortKey::Variation5y => stock.variation_5y.map(SortValue::Number),
        SortKey::UpsidePotential => stock.upside_potential.map(SortValue::Number),
        SortKey::VariationDay => stock.variation_day.map(SortValue::Number),
        SortKey::VariationWeek => stock.variation_week.map(SortValue::Number),
        SortKey::Volume => stock.volume.map(SortValue::Number),
    }
}

fn matches_search(stock: &Stock, needle: &str) -> bool {
    needle.is_empty()
        || stock.ticker.to_lowercase().contains(needle)
        || stock.company.to_lowercase().contains(needle)
        || stock.sector.to_lowercase().contains(needle)
}

/// Rows matching `search_term` (case-insensitive, on ticker, company or
/// sector), sorted stably by `sort`. Rows without a value for the sort
/// column always come last, in either direction.
pub fn filter_and_sort(stocks: &[Stock], search_term: &str, sort: Option<SortConfig>) -> Vec<Stock> {
    let needle = search_term.to_lowercase();
    let mut rows: Vec<Stock> = stocks
        .iter()
        .filter(|s| matches_search(s, &needle))
        .cloned()
        .collect();

    if let Some(SortConfig { key, direction }) = sort {
        rows.sort_by(|a, b| match (sort_value(a, key), sort_value(b, key)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => match direction {
                SortDirection::Asc => x.compare(&y),
                SortDirection::Desc => y.compare(&x),
            },
        });
    }

    rows
}
