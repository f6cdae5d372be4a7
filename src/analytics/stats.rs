//! Headline statistics for the dashboard cards and the sector chart

use crate::ingest::types::Stock;
use serde::Serialize;
use std::collections::HashMap;

/// Number of stocks in one sector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStats {
    pub average_price: f64,
    pub top_gainer: Option<Stock>,
    pub top_loser: Option<Stock>,
    /// Groups in first-seen order
    pub sector_counts: Vec<SectorCount>,
}

/// Compute the stats for `stocks`.
///
/// Stocks without a day variation never win top gainer or top loser. Ties go
/// to the stock that appears first.
pub fn compute_stats(stocks: &[Stock]) -> StockStats {
    let average_price = if stocks.is_empty() {
        0.0
    } else {
        stocks.iter().map(|s| s.price).sum::<f64>() / stocks.len() as f64
    };

    let mut top_gainer: Option<(&Stock, f64)> = None;
    let mut top_loser: Option<(&Stock, f64)> = None;
    for stock in stocks {
        let Some(change) = stock.variation_day else {
            continue;
        };
        if top_gainer.map_or(true, |(_, best)| change > best) {
            top_gainer = Some((stock, change));
        }
        if top_loser.map_or(true, |(_, worst)| change < worst) {
            top_loser = Some((stock, change));
        }
    }

    let mut sector_counts: Vec<SectorCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for stock in stocks {
        match index.get(stock.sector.as_str()) {
            Some(&i) => sector_counts[i].value += 1,
            None => {
                index.insert(&stock.sector, sector_counts.len());
                sector_counts.push(SectorCount {
                    name: stock.sector.clone(),
                    value: 1,
                });
            }
        }
    }

    StockStats {
        average_price,
        top_gainer: top_gainer.map(|(s, _)| s.clone()),
        top_loser: top_loser.map(|(s, _)| s.clone()),
        sector_counts,
    }
}
