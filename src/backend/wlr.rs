//! `wlr-randr` backend implementation.
//!
//! Invokes the enumeration tool with no arguments and captures its
//! output under a hard timeout. The tool prints one block per output
//! device; parsing that text is the display-list parser's job.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::DisplayBackend;
use crate::config::Config;

/// Backend that shells out to `wlr-randr` (or a configured replacement).
#[derive(Debug, Clone)]
pub struct WlrRandrBackend {
    command: String,
    timeout: Duration,
}

impl WlrRandrBackend {
    /// Create a backend from the host configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            command: config.command.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl DisplayBackend for WlrRandrBackend {
    #[instrument(skip(self), fields(command = %self.command))]
    async fn enumerate(&self) -> Result<String> {
        let mut child = Command::new(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to run {}", self.command))?;

        // Take pipe handles out so `child` stays in scope for kill-on-timeout
        let mut child_stdout = child.stdout.take().context("Failed to open stdout")?;
        let mut child_stderr = child.stderr.take().context("Failed to open stderr")?;

        let read_all = async {
            let mut stdout_buf = Vec::new();
            let mut stderr_buf = Vec::new();
            let (r1, r2) = tokio::join!(
                child_stdout.read_to_end(&mut stdout_buf),
                child_stderr.read_to_end(&mut stderr_buf),
            );
            r1.context("Failed to read stdout")?;
            r2.context("Failed to read stderr")?;
            Ok::<_, anyhow::Error>((stdout_buf, stderr_buf))
        };

        let (stdout_buf, stderr_buf) =
            if let Ok(result) = tokio::time::timeout(self.timeout, read_all).await {
                result?
            } else {
                let _ = child.kill().await;
                anyhow::bail!(
                    "{} timed out after {}ms",
                    self.command,
                    self.timeout.as_millis()
                );
            };

        let status = child.wait().await.context("Failed to wait for process")?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_buf);
            anyhow::bail!("{} exited with {}: {}", self.command, status, stderr.trim());
        }

        debug!(bytes = stdout_buf.len(), "Enumeration completed");

        Ok(String::from_utf8_lossy(&stdout_buf).into_owned())
    }
}
