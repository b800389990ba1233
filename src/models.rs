// src/models.rs
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{LaunchError, Result};

/// The state string the status endpoint reports once a backend accepts connections.
pub const READY_STATE: &str = "Ready";

#[derive(Serialize, Debug, Clone)]
pub struct SpawnRequest<'a> {
    pub tag: &'a str,
}

/// Raw spawn response as sent by the API. Validated into [`SpawnResult`].
#[derive(Deserialize, Debug)]
struct SpawnResponse {
    url: Option<String>,
    status_url: Option<String>,
    name: Option<String>,
    spawned: Option<bool>,
}

/// A spawned backend: where to reach it and where to ask if it is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnResult {
    pub url: String,
    pub status_url: String,
    pub name: Option<String>,
    /// `Some(false)` when the API handed back an already-running backend.
    pub spawned: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StatusResult {
    /// Absent or `null` states are never ready.
    #[serde(default)]
    pub state: Option<String>,
}

impl SpawnResult {
    pub fn parse(body: &str) -> Result<Self> {
        let raw: SpawnResponse = parse_json(body, "spawn")?;

        let url = required_field(raw.url, "url")?;
        let status_url = required_field(raw.status_url, "status_url")?;

        Ok(SpawnResult {
            url,
            status_url,
            name: raw.name,
            spawned: raw.spawned,
        })
    }
}

impl StatusResult {
    pub fn parse(body: &str) -> Result<Self> {
        parse_json(body, "get status")
    }

    pub fn is_ready(&self) -> bool {
        self.state.as_deref() == Some(READY_STATE)
    }
}

/// Deserialize `body`, mapping malformed JSON and a bare `null` to `InvalidResponse`.
fn parse_json<T: DeserializeOwned>(body: &str, action: &str) -> Result<T> {
    let value: Option<T> = serde_json::from_str(body).map_err(|e| {
        LaunchError::InvalidResponse(format!("Attempt to {} returned invalid JSON: {}", action, e))
    })?;
    value.ok_or_else(|| {
        LaunchError::InvalidResponse(format!("Attempt to {} returned null", action))
    })
}

fn required_field(value: Option<String>, field: &str) -> Result<String> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        LaunchError::InvalidResponse(format!(
            "Attempt to spawn returned no '{}' in the response",
            field
        ))
    })
}
