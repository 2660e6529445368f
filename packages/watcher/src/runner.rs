//! Watcher execution logic with reconnection support.

use std::time::Duration;

use super::{
    error::ClientError,
    mirror::RoomMirror,
    session::{Endpoints, run_watch_session},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Watch `pass` on the server at `url` until Ctrl+C.
///
/// Every (re)connection fetches a fresh snapshot. A session that managed to
/// connect resets the attempt counter.
pub async fn run_watcher(url: String, pass: String) -> Result<(), ClientError> {
    let endpoints = Endpoints::new(&url, &pass)?;
    let mut mirror = RoomMirror::new();
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to watch room '{}' on {} (attempt {}/{})",
            pass,
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let result = tokio::select! {
            result = run_watch_session(&endpoints, &pass, &mut mirror) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                return Ok(());
            }
        };

        reconnect_count = next_reconnect_count(reconnect_count, result)?;

        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            RECONNECT_INTERVAL_SECS,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );
        tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
    }
}

/// Attempt counter after a session ended with `result`.
///
/// `Err` means the watcher must stop: the URL is unusable or too many
/// consecutive attempts failed.
fn next_reconnect_count(
    reconnect_count: u32,
    result: Result<(), ClientError>,
) -> Result<u32, ClientError> {
    let next = match result {
        Ok(()) => {
            tracing::info!("Server closed the subscription");
            0
        }
        Err(ClientError::ConnectionLost) => {
            tracing::warn!("Connection lost");
            0
        }
        Err(e @ ClientError::InvalidUrl(_)) => return Err(e),
        Err(e) => {
            tracing::warn!("{}", e);
            reconnect_count + 1
        }
    };

    if next >= MAX_RECONNECT_ATTEMPTS {
        return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
    }
    Ok(next)
}
