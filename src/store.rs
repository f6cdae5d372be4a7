//! Read access to the JSON snapshot file written by the update script

use crate::error::{AppError, Result};
use crate::ingest::rows::ApiPayload;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Metadata shown by the status endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub atualizado_em: Option<String>,
    pub data_referencia: Option<String>,
    pub fonte: Option<String>,
    pub total_acoes: u64,
}

/// The snapshot file on disk
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw document, or `None` when the file is missing or not valid JSON
    pub async fn read_raw(&self) -> Option<Value> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Snapshot file {} is not valid JSON: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Typed document for the resolver
    pub async fn read_payload(&self) -> Result<ApiPayload> {
        let value = self
            .read_raw()
            .await
            .ok_or_else(|| AppError::NotFound(format!("{}", self.path.display())))?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn metadata(&self) -> Option<SnapshotMetadata> {
        self.read_raw().await.map(|value| metadata_of(&value))
    }
}

fn metadata_of(value: &Value) -> SnapshotMetadata {
    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    let total_acoes = value
        .get("totalAcoes")
        .and_then(Value::as_u64)
        .or_else(|| {
            value
                .get("acoes")
                .and_then(Value::as_array)
                .map(|rows| rows.len() as u64)
        })
        .unwrap_or(0);

    SnapshotMetadata {
        atualizado_em: text("atualizadoEm"),
        data_referencia: text("dataReferencia"),
        fonte: text("fonte"),
        total_acoes,
    }
}
