//! Server configuration loaded from the environment

use crate::error::{AppError, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Project root; snapshot, assets and script paths hang off it
    pub root_dir: PathBuf,
    pub update_interpreter: String,
    pub update_timeout: Duration,
    /// `None` disables the auto-update scheduler
    pub auto_update_interval: Option<Duration>,
    pub default_max_price: f64,
    /// When set, the dashboard resolves from this URL instead of the snapshot file
    pub feed_url: Option<String>,
    pub live_fetch_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            root_dir: PathBuf::from("."),
            update_interpreter: "python3".to_string(),
            update_timeout: Duration::from_secs(10 * 60),
            auto_update_interval: Some(Duration::from_secs(30 * 60)),
            default_max_price: 10.0,
            feed_url: None,
            live_fetch_timeout: Duration::from_secs(8),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid value for {}: {:?}", key, raw)))
}

impl ServerConfig {
    /// Read the process environment, after loading `.env` if present
    pub fn from_env() -> Result<Self> {
        // A missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_value("PORT", &port)?;
        }
        if let Some(root) = get("STOCK_RADAR_ROOT") {
            config.root_dir = PathBuf::from(root);
        }
        if let Some(interpreter) = get("UPDATE_INTERPRETER") {
            config.update_interpreter = interpreter;
        }
        if let Some(secs) = get("UPDATE_TIMEOUT_SECS") {
            config.update_timeout = Duration::from_secs(parse_value("UPDATE_TIMEOUT_SECS", &secs)?);
        }
        if let Some(mins) = get("AUTO_UPDATE_INTERVAL_MINS") {
            let mins: u64 = parse_value("AUTO_UPDATE_INTERVAL_MINS", &mins)?;
            config.auto_update_interval = (mins > 0).then(|| Duration::from_secs(mins * 60));
        }
        if let Some(price) = get("DEFAULT_MAX_PRICE") {
            let price: f64 = parse_value("DEFAULT_MAX_PRICE", &price)?;
            if !price.is_finite() || price <= 0.0 {
                return Err(AppError::Config(format!(
                    "DEFAULT_MAX_PRICE must be positive, got {}",
                    price
                )));
            }
            config.default_max_price = price;
        }
        if let Some(url) = get("STOCKS_FEED_URL") {
            config.feed_url = Some(url);
        }
        if let Some(secs) = get("LIVE_FETCH_TIMEOUT_SECS") {
            config.live_fetch_timeout =
                Duration::from_secs(parse_value("LIVE_FETCH_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid address: {}", e)))
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root_dir.join("public").join("stocks.json")
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root_dir.join("dist")
    }

    pub fn update_script(&self) -> PathBuf {
        self.root_dir.join("scripts").join("update_stocks.py")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.default_max_price, 10.0);
        assert_eq!(config.live_fetch_timeout, Duration::from_secs(8));
        assert_eq!(config.auto_update_interval, Some(Duration::from_secs(1800)));
        assert_eq!(config.snapshot_path(), PathBuf::from("./public/stocks.json"));
        assert_eq!(config.listen_addr().unwrap().port(), 3001);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("PORT", "8080"),
            ("STOCK_RADAR_ROOT", "/srv/radar"),
            ("AUTO_UPDATE_INTERVAL_MINS", "0"),
            ("DEFAULT_MAX_PRICE", "5.5"),
            ("STOCKS_FEED_URL", "http://feed.local/api/stocks"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.auto_update_interval, None);
        assert_eq!(config.default_max_price, 5.5);
        assert_eq!(config.update_script(), PathBuf::from("/srv/radar/scripts/update_stocks.py"));
        assert_eq!(config.feed_url.as_deref(), Some("http://feed.local/api/stocks"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(from_pairs(&[("PORT", "http")]), Err(AppError::Config(_))));
        assert!(from_pairs(&[("DEFAULT_MAX_PRICE", "-1")]).is_err());
        assert!(from_pairs(&[("UPDATE_TIMEOUT_SECS", "ten")]).is_err());
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = from_pairs(&[("PORT", "  "), ("HOST", "")]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.host, "0.0.0.0");
    }
}
