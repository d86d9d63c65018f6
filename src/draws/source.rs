//! Draw sources: the remote results API and local payload files

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::time::timeout;

use super::parser::parse_payload;
use super::DrawSource;
use crate::error::{Result, SenaForgeError};
use crate::types::{Draw, FetchConfig};

/// Fetches draws from the HTTP results endpoint
pub struct HttpDrawSource {
    client: Client,
    config: FetchConfig,
}

impl HttpDrawSource {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SenaForgeError::network(e.to_string(), None, None))?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl DrawSource for HttpDrawSource {
    async fn fetch_draws(&self, count: usize) -> Result<Vec<Draw>> {
        let url = self.config.endpoint.clone();
        let timeout_secs = self.config.timeout.as_secs().max(1);
        let start = Instant::now();

        tracing::debug!(url = %url, count = %count, "Requesting draw results");

        let response = timeout(self.config.timeout, self.client.get(&url).send())
            .await
            .map_err(|_| SenaForgeError::timeout("results request", timeout_secs))?
            .map_err(|e| {
                if e.is_timeout() {
                    SenaForgeError::timeout("results request", timeout_secs)
                } else {
                    SenaForgeError::network(e.to_string(), None, Some(url.clone()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SenaForgeError::network(
                format!("results API answered with status {}", status),
                Some(status.as_u16()),
                Some(url),
            ));
        }

        let text = timeout(self.config.timeout, response.text())
            .await
            .map_err(|_| SenaForgeError::timeout("results body", timeout_secs))?
            .map_err(|e| SenaForgeError::network(e.to_string(), Some(status.as_u16()), Some(url.clone())))?;

        let draws = parse_payload(&text, count)?;

        tracing::debug!(
            url = %url,
            draws = %draws.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Draw results parsed"
        );

        Ok(draws)
    }

    fn describe(&self) -> String {
        self.config.endpoint.clone()
    }
}

/// Reads a saved results payload from disk
pub struct FileDrawSource {
    path: PathBuf,
}

impl FileDrawSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DrawSource for FileDrawSource {
    async fn fetch_draws(&self, count: usize) -> Result<Vec<Draw>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SenaForgeError::io(e.to_string(), Some(self.path.to_string_lossy().to_string()))
        })?;
        parse_payload(&text, count)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
