//! End-to-end ingestion: raw text in, dashboard views out

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use stock_radar::analytics::{compute_stats, filter_and_sort, SortConfig, SortDirection, SortKey};
use stock_radar::ingest::static_data::parse_static_table;
use stock_radar::ingest::{ApiPayload, HttpLiveSource, SnapshotFileSource, SourceResolver};
use stock_radar::store::SnapshotStore;
use tempfile::TempDir;

const TABLE: &str = "\
Ticker,Empresa,Preço Atual (R$),Setor,Dividend Yield (%),P/L,P/VP,Variação 5 Anos (%),Upside Graham (%),Var. Dia (%),Var. Semana (%),Volume,Última Atualização
AZUL4,Azul S.A.,\"R$ 0,81\",Bens Industriais,,,,\"-96,59%\",,,\"0,00%\",,21/02/2026 21:06
RAIZ4,Raizen SA,\"R$ 0,60\",Consumo Não Cíclico,,,\"0,43\",\"-87,02%\",,\"-3,23%\",\"-10,45%\",90.473.100,21/02/2026 21:06
PETZ3,,,,,,,,,,,,21/02/2026 21:06
LJQQ3,Lojas Quero-Quero SA,\"R$ 2,43\",Consumo Cíclico,,\"-4,45\",\"1,12\",\"-86,17%\",,\"+5,65%\",\"+5,19%\",3.272.700,21/02/2026 21:06
";

#[test]
fn static_table_to_views() {
    let stocks = parse_static_table(TABLE).unwrap();
    assert_eq!(stocks.len(), 3);

    let azul = &stocks[0];
    assert_eq!(azul.ticker, "AZUL4");
    assert_eq!(azul.price, 0.81);
    assert_eq!(azul.price_earnings, None);
    assert_eq!(azul.variation_5y, Some(-96.59));
    assert_eq!(stocks[1].volume, Some(90_473_100.0));

    let stats = compute_stats(&stocks);
    assert_eq!(stats.top_gainer.as_ref().unwrap().ticker, "LJQQ3");
    assert_eq!(stats.top_loser.as_ref().unwrap().ticker, "RAIZ4");
    assert!((stats.average_price - (0.81 + 0.60 + 2.43) / 3.0).abs() < 1e-9);
    assert_eq!(stats.sector_counts.len(), 3);

    let sort = SortConfig { key: SortKey::PriceEarnings, direction: SortDirection::Asc };
    let view = filter_and_sort(&stocks, "", Some(sort));
    let tickers: Vec<&str> = view.iter().map(|s| s.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["LJQQ3", "AZUL4", "RAIZ4"]);

    // pure: a second pass gives the same answer
    assert_eq!(compute_stats(&stocks), stats);
    assert_eq!(filter_and_sort(&stocks, "", Some(sort)), view);
}

#[test]
fn api_payload_to_stocks() {
    let payload: ApiPayload = serde_json::from_value(json!({
        "atualizadoEm": "2026-02-23 14:00",
        "acoes": [
            { "ticker": "CASH3", "empresa": "Meliuz SA", "preco": 3.52, "dy": "n/d", "volume": 1424600 },
            { "ticker": "", "empresa": "Blank" },
            { "ticker": "MRVE3", "setor": null, "ultimaAtualizacao": "23/02/2026 13:55" }
        ]
    }))
    .unwrap();

    let stocks = payload.into_stocks();
    assert_eq!(stocks.len(), 2);
    assert_eq!(stocks[0].dividend_yield, None);
    assert_eq!(stocks[0].volume, Some(1_424_600.0));
    assert_eq!(stocks[0].last_updated, "2026-02-23 14:00");
    assert_eq!(stocks[1].company, "MRVE3");
    assert_eq!(stocks[1].sector, "N/A");
    assert_eq!(stocks[1].price, 0.0);
    assert_eq!(stocks[1].last_updated, "23/02/2026 13:55");
}

#[tokio::test]
async fn unreachable_feed_still_resolves() {
    // nothing listens on port 1
    let live = HttpLiveSource::new(
        "http://127.0.0.1:1/api/stocks",
        Duration::from_secs(2),
    )
    .unwrap();
    let snapshot = SourceResolver::new(Arc::new(live))
        .with_timeout(Duration::from_secs(2))
        .resolve()
        .await;

    assert!(!snapshot.is_live);
    assert!(!snapshot.stocks.is_empty());
}

#[tokio::test]
async fn snapshot_file_resolves_live() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stocks.json");
    std::fs::write(
        &path,
        json!({
            "fonte": "yfinance",
            "acoes": [{ "ticker": "COGN3", "empresa": "Cogna", "preco": 3.63 }]
        })
        .to_string(),
    )
    .unwrap();

    let store = Arc::new(SnapshotStore::new(path));
    let snapshot = SourceResolver::new(Arc::new(SnapshotFileSource::new(store)))
        .resolve()
        .await;

    assert!(snapshot.is_live);
    assert_eq!(snapshot.stocks.len(), 1);
    assert_eq!(snapshot.source_label, "yfinance");
    assert_eq!(snapshot.last_update, "");
}

/// Serve a one-row feed that answers after `delay`
async fn slow_feed(delay: Duration) -> String {
    use axum::{routing::get, Json, Router};

    let app = Router::new().route(
        "/api/stocks",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({
                "fonte": "yfinance",
                "acoes": [{ "ticker": "COGN3", "empresa": "Cogna", "preco": 3.63 }]
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/stocks", addr)
}

#[tokio::test]
async fn http_feed_honours_configured_timeout() {
    let url = slow_feed(Duration::from_millis(300)).await;

    let short = HttpLiveSource::new(url.clone(), Duration::from_millis(100)).unwrap();
    let snapshot = SourceResolver::new(Arc::new(short))
        .with_timeout(Duration::from_secs(5))
        .resolve()
        .await;
    assert!(!snapshot.is_live);

    let long = HttpLiveSource::new(url, Duration::from_secs(5)).unwrap();
    let snapshot = SourceResolver::new(Arc::new(long))
        .with_timeout(Duration::from_secs(5))
        .resolve()
        .await;
    assert!(snapshot.is_live);
    assert_eq!(snapshot.stocks[0].ticker, "COGN3");
}
