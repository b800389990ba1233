// src/backend/jamsocket.rs

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use std::time::Instant;

use crate::backend::BackendApi;
use crate::config::LaunchConfig;
use crate::errors::{LaunchError, Result};
use crate::models::{SpawnRequest, SpawnResult, StatusResult};

/// Client for the Jamsocket spawn API and the backends it hands out.
pub struct JamsocketClient {
    client: Client,
    token: String,
    api_base: String,
}

impl JamsocketClient {
    /// Creates a new `JamsocketClient`. Every request carries `token` as a bearer credential.
    pub fn new(client: Client, token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(client: Client, config: &LaunchConfig) -> Self {
        Self::new(client, config.token.clone(), config.api_base.clone())
    }

    fn spawn_url(&self, account: &str, service: &str) -> String {
        format!("{}/user/{}/service/{}/spawn", self.api_base, account, service)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
    }

    /// Sends the request and returns the body text, failing on any non-2xx status.
    async fn send_checked(&self, request: RequestBuilder, url: &str) -> Result<String> {
        let start = Instant::now();
        let resp = self.authorized(request).send().await?;

        let status = resp.status();
        log::debug!(
            "📥 {} responded {} ({}ms)",
            url,
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(LaunchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: error_body,
            });
        }

        Ok(resp.text().await?)
    }
}

impl BackendApi for JamsocketClient {
    async fn spawn(&self, account: &str, service: &str, tag: &str) -> Result<SpawnResult> {
        let url = self.spawn_url(account, service);

        log::info!("📡 Spawning {}/{} (tag {})", account, service, tag);

        let body = SpawnRequest { tag };
        let text = self
            .send_checked(self.client.post(&url).json(&body), &url)
            .await?;

        SpawnResult::parse(&text)
    }

    async fn status(&self, status_url: &str) -> Result<StatusResult> {
        let text = self
            .send_checked(self.client.get(status_url), status_url)
            .await?;

        StatusResult::parse(&text)
    }

    async fn connect(&self, url: &str) -> Result<String> {
        log::info!("🔌 Connecting to {}", url);
        self.send_checked(self.client.get(url), url).await
    }
}
