//! Runs the external update script

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Arguments for one update run
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    /// Price ceiling passed as `--max-preco`; `None` leaves the script default
    pub max_price: Option<f64>,
}

/// Something that regenerates the snapshot file
#[async_trait]
pub trait UpdateRunner: Send + Sync {
    /// Run to completion; `Ok` carries the captured stdout
    async fn run(&self, request: &UpdateRequest) -> Result<String>;
}

/// `<interpreter> <script> [--max-preco N]`, run in the project root
pub struct ScriptRunner {
    pub interpreter: String,
    pub script: PathBuf,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl ScriptRunner {
    fn args(&self, request: &UpdateRequest) -> Vec<String> {
        let mut args = vec![self.script.display().to_string()];
        if let Some(max_price) = request.max_price {
            args.push("--max-preco".to_string());
            args.push(max_price.to_string());
        }
        args
    }
}

#[async_trait]
impl UpdateRunner for ScriptRunner {
    async fn run(&self, request: &UpdateRequest) -> Result<String> {
        let args = self.args(request);
        debug!("Running {} {}", self.interpreter, args.join(" "));

        let child = Command::new(&self.interpreter)
            .args(&args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                AppError::Timeout(format!("update script exceeded {:?}", self.timeout))
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() {
            info!("Update script finished ({} bytes of output)", stdout.len());
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() { stdout } else { stderr };
            Err(AppError::Upstream(format!(
                "update script exited with {}: {}",
                output.status, detail
            )))
        }
    }
}
