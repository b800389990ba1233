// src/launcher.rs
use std::time::{Duration, Instant};

use crate::backend::BackendApi;
use crate::config::LaunchConfig;
use crate::errors::{LaunchError, Result};

/// Polls `status_url` until it reports `Ready`, sleeping `interval` between attempts.
///
/// Any state other than `Ready` means keep polling. A failed request or an
/// unparseable status ends the wait immediately. With no `deadline` the loop
/// never gives up on its own. Returns the number of status requests issued.
pub async fn wait_for_ready<A: BackendApi>(
    api: &A,
    status_url: &str,
    interval: Duration,
    deadline: Option<Duration>,
) -> Result<u32> {
    let mut attempts = 0u32;
    let mut last_state = String::new();

    let poll = async {
        loop {
            let status = api.status(status_url).await?;
            attempts += 1;

            if status.is_ready() {
                return Ok::<u32, LaunchError>(attempts);
            }

            log::debug!(
                "⏳ Backend state '{}' after {} attempt(s), retrying in {}ms",
                status.state.as_deref().unwrap_or("none"),
                attempts,
                interval.as_millis()
            );
            last_state = status.state.unwrap_or_default();

            tokio::time::sleep(interval).await;
        }
    };

    match deadline {
        None => poll.await,
        Some(limit) => {
            let outcome = tokio::time::timeout(limit, poll).await;
            match outcome {
                Ok(result) => result,
                Err(_) => Err(LaunchError::ReadyTimeout {
                    waited: limit,
                    last_state: if last_state.is_empty() {
                        "unknown".to_string()
                    } else {
                        last_state
                    },
                }),
            }
        }
    }
}

/// Spawn a backend, wait until it is ready, then fetch its response body.
pub async fn launch<A: BackendApi>(api: &A, config: &LaunchConfig) -> Result<String> {
    let launch_start = Instant::now();

    let spawned = api
        .spawn(&config.account, &config.service, &config.tag)
        .await?;

    match (&spawned.name, spawned.spawned) {
        (Some(name), Some(false)) => log::info!("♻️  Reusing running backend {}", name),
        (Some(name), _) => log::info!("🚀 Spawned backend {}", name),
        (None, _) => log::info!("🚀 Spawned backend at {}", spawned.url),
    }

    let attempts = wait_for_ready(
        api,
        &spawned.status_url,
        config.poll_interval,
        config.ready_timeout,
    )
    .await?;

    log::info!(
        "✅ Backend ready after {} status check(s) ({}ms)",
        attempts,
        launch_start.elapsed().as_millis()
    );

    api.connect(&spawned.url).await
}
