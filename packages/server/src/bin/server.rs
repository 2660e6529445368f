//! Whiteboard server: persists completed strokes per room and fans them out
//! to WebSocket subscribers in chunks.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kokuban-server
//! cargo run --bin kokuban-server -- --host 0.0.0.0 --port 3000 --chunk-size 100
//! KOKUBAN_ROOM_TTL_SECS=3600 cargo run --bin kokuban-server
//! ```

use std::sync::Arc;

use clap::Parser;
use kokuban_server::{
    config::{ServerArgs, ServerConfig},
    infrastructure::{publisher::BroadcastFanoutPublisher, repository::InMemoryRoomStore},
    ui::{AppState, Server},
};
use kokuban_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("kokuban_server", env!("CARGO_BIN_NAME"), "debug");

    let config = match ServerConfig::try_from(ServerArgs::parse()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    tracing::debug!("{:?}", config);

    // Initialize dependencies in order:
    // 1. RoomStore
    // 2. FanoutPublisher
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Create RoomStore (in-memory, TTL from last write)
    let clock = Arc::new(SystemClock);
    let store = Arc::new(InMemoryRoomStore::new(clock.clone(), config.room_ttl));
    let _reaper = config
        .reaper_interval
        .map(|interval| store.spawn_reaper(interval));

    // 2. Create FanoutPublisher (tokio broadcast channels)
    let publisher = Arc::new(BroadcastFanoutPublisher::new(config.channel_capacity));

    // 3. Create UseCases
    let state = AppState::new(store, publisher, clock, config.chunk_size);

    // 4. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
