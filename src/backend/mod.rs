// src/backend/mod.rs

use crate::errors::Result;
use crate::models::{SpawnResult, StatusResult};

pub mod jamsocket;

/// The three calls the launcher makes against a backend orchestration API.
///
/// Methods return `Send` futures so implementations can be plain `async fn`s.
pub trait BackendApi: Send + Sync {
    /// Requests a new backend for `service` under `account`, built from image `tag`.
    fn spawn(
        &self,
        account: &str,
        service: &str,
        tag: &str,
    ) -> impl std::future::Future<Output = Result<SpawnResult>> + Send;

    /// Fetches the current state of a spawned backend.
    fn status(&self, status_url: &str) -> impl std::future::Future<Output = Result<StatusResult>> + Send;

    /// Issues one request to a ready backend and returns the body unparsed.
    fn connect(&self, url: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}
