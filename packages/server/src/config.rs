//! Server configuration.
//!
//! CLI flags (with environment variable fallbacks) are parsed by clap into
//! [`ServerArgs`] and then validated into a [`ServerConfig`].

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::{
    domain::{ChunkSize, DEFAULT_CHUNK_SIZE},
    infrastructure::{publisher::BroadcastFanoutPublisher, repository::DEFAULT_ROOM_TTL},
};

/// 起動時の設定エラー（致命的）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("chunk size must be at least 1")]
    ZeroChunkSize,
    #[error("room TTL must be at least 1 second")]
    ZeroRoomTtl,
    #[error("channel capacity must be at least 1")]
    ZeroChannelCapacity,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "kokuban-server")]
#[command(about = "Shared whiteboard server with chunked stroke fan-out", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "KOKUBAN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "KOKUBAN_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum number of points per published chunk
    #[arg(long, env = "KOKUBAN_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Seconds a room survives without writes
    #[arg(long, env = "KOKUBAN_ROOM_TTL_SECS", default_value_t = DEFAULT_ROOM_TTL.as_secs())]
    pub room_ttl_secs: u64,

    /// Seconds between sweeps of expired rooms (0 disables the sweeper)
    #[arg(long, env = "KOKUBAN_REAPER_INTERVAL_SECS", default_value_t = 60)]
    pub reaper_interval_secs: u64,

    /// Events buffered per subscriber before it starts losing the oldest ones
    #[arg(
        long,
        env = "KOKUBAN_CHANNEL_CAPACITY",
        default_value_t = BroadcastFanoutPublisher::DEFAULT_CAPACITY
    )]
    pub channel_capacity: usize,
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub chunk_size: ChunkSize,
    pub room_ttl: Duration,
    /// `None` のときは期限切れ Room の掃除タスクを起動しない（読み取り時の判定のみ）
    pub reaper_interval: Option<Duration>,
    pub channel_capacity: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            chunk_size: ChunkSize::default(),
            room_ttl: DEFAULT_ROOM_TTL,
            reaper_interval: Some(Duration::from_secs(60)),
            channel_capacity: BroadcastFanoutPublisher::DEFAULT_CAPACITY,
        }
    }
}

impl TryFrom<ServerArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        let chunk_size = ChunkSize::new(args.chunk_size).map_err(|_| ConfigError::ZeroChunkSize)?;
        if args.room_ttl_secs == 0 {
            return Err(ConfigError::ZeroRoomTtl);
        }
        if args.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        let reaper_interval =
            (args.reaper_interval_secs > 0).then(|| Duration::from_secs(args.reaper_interval_secs));

        Ok(Self {
            host: args.host,
            port: args.port,
            chunk_size,
            room_ttl: Duration::from_secs(args.room_ttl_secs),
            reaper_interval,
            channel_capacity: args.channel_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerArgs {
        ServerArgs::try_parse_from(std::iter::once("kokuban-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        // テスト項目: フラグ無しでデフォルト設定になる
        // given (前提条件):
        let args = ServerArgs {
            host: "127.0.0.1".to_string(),
            port: 8080,
            chunk_size: DEFAULT_CHUNK_SIZE,
            room_ttl_secs: DEFAULT_ROOM_TTL.as_secs(),
            reaper_interval_secs: 60,
            channel_capacity: BroadcastFanoutPublisher::DEFAULT_CAPACITY,
        };

        // when (操作):
        let config = ServerConfig::try_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.chunk_size.get(), 50);
        assert_eq!(config.room_ttl, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_flags_override_defaults() {
        // テスト項目: フラグで各値を上書きできる
        // given (前提条件):
        let args = parse(&[
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--chunk-size",
            "10",
            "--room-ttl-secs",
            "120",
            "--reaper-interval-secs",
            "0",
            "--channel-capacity",
            "8",
        ]);

        // when (操作):
        let config = ServerConfig::try_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.chunk_size.get(), 10);
        assert_eq!(config.room_ttl, Duration::from_secs(120));
        assert_eq!(config.reaper_interval, None);
        assert_eq!(config.channel_capacity, 8);
    }

    #[test]
    fn test_zero_values_are_rejected() {
        // テスト項目: 0 を指定できない項目はエラーになる
        // given (前提条件):
        let cases = [
            (vec!["--chunk-size", "0"], ConfigError::ZeroChunkSize),
            (vec!["--room-ttl-secs", "0"], ConfigError::ZeroRoomTtl),
            (vec!["--channel-capacity", "0"], ConfigError::ZeroChannelCapacity),
        ];

        for (flags, expected) in cases {
            // when (操作):
            let result = ServerConfig::try_from(parse(&flags));

            // then (期待する結果):
            assert_eq!(result, Err(expected));
        }
    }

    #[test]
    fn test_non_numeric_flag_is_a_parse_error() {
        // テスト項目: 数値でない値は clap がエラーにする
        // given (前提条件):
        let args = ["kokuban-server", "--chunk-size", "many"];

        // when (操作):
        let result = ServerArgs::try_parse_from(args);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
