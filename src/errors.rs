// src/errors.rs
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("{name} environment variable is not provided")]
    MissingVariable { name: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read settings file: {0}")]
    SettingsFile(#[from] std::io::Error),

    #[error("Failed to parse TOML settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatus { status: u16, url: String, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Backend not ready after {waited:?} (last state: {last_state})")]
    ReadyTimeout { waited: Duration, last_state: String },
}

impl LaunchError {
    /// True for failures raised while loading configuration, before any request is sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LaunchError::MissingVariable { .. }
                | LaunchError::Config(_)
                | LaunchError::SettingsFile(_)
                | LaunchError::SettingsParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
