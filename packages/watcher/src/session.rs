//! One watch session: subscribe, load the snapshot, follow live events.

use futures_util::StreamExt;
use kokuban_server::infrastructure::dto::{event::EventEnvelope, http::WhiteboardStateResponse};
use reqwest::Url;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use super::{error::ClientError, formatter::EventFormatter, mirror::RoomMirror};

/// HTTP / WebSocket endpoints derived from the `--url` base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub subscribe: Url,
    pub snapshot: Url,
}

impl Endpoints {
    /// `http://host:port` → `ws://host:port/ws?pass=..` and
    /// `http://host:port/api/whiteboard/{pass}`
    pub fn new(base: &str, pass: &str) -> Result<Self, ClientError> {
        let invalid = || ClientError::InvalidUrl(base.to_string());
        let base = Url::parse(base).map_err(|_| invalid())?;
        let ws_scheme = match base.scheme() {
            "http" => "ws",
            "https" => "wss",
            _ => return Err(invalid()),
        };

        let mut snapshot = base.clone();
        snapshot
            .path_segments_mut()
            .map_err(|_| invalid())?
            .clear()
            .extend(["api", "whiteboard", pass]);

        let mut subscribe = base;
        subscribe.set_scheme(ws_scheme).map_err(|_| invalid())?;
        subscribe.set_path("/ws");
        subscribe.query_pairs_mut().clear().append_pair("pass", pass);

        Ok(Self {
            subscribe,
            snapshot,
        })
    }
}

/// Run one watch session until the connection drops.
///
/// Returns `Ok(())` when the server closes the subscription with a Close
/// frame and `Err(ClientError::ConnectionLost)` when the stream fails or ends
/// without one.
///
/// The subscription is opened before the snapshot is fetched so that no
/// event published in between is missed; events that also made it into the
/// snapshot are applied again, which is harmless.
pub async fn run_watch_session(
    endpoints: &Endpoints,
    pass: &str,
    mirror: &mut RoomMirror,
) -> Result<(), ClientError> {
    // 1. 購読を開始
    let (ws_stream, _response) = connect_async(endpoints.subscribe.as_str())
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;
    tracing::info!("Subscribed to room '{}'", pass);

    // 2. スナップショットを取得
    let snapshot = fetch_snapshot(&endpoints.snapshot).await?;
    mirror.load_snapshot(&snapshot);
    print!("{}", EventFormatter::format_snapshot(pass, &snapshot));

    // 3. ライブイベントを適用
    let (_write, mut read) = ws_stream.split();
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<EventEnvelope>(&text) {
                Ok(envelope) => {
                    let event = mirror.apply(envelope);
                    if let Some(line) = EventFormatter::format_event(&event) {
                        print!("{}", line);
                    }
                }
                Err(_) => print!("{}", EventFormatter::format_raw_message(&text)),
            },
            Ok(Message::Close(_)) => return Ok(()),
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
            _ => {}
        }
    }

    Err(ClientError::ConnectionLost)
}

async fn fetch_snapshot(url: &Url) -> Result<WhiteboardStateResponse, ClientError> {
    let response = reqwest::get(url.clone())
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| ClientError::Snapshot(e.to_string()))?;
    response
        .json::<WhiteboardStateResponse>()
        .await
        .map_err(|e| ClientError::Snapshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_http_base() {
        // テスト項目: http のベース URL から購読とスナップショットの URL が作られる
        // given (前提条件):
        let base = "http://127.0.0.1:8080";

        // when (操作):
        let endpoints = Endpoints::new(base, "roomA").unwrap();

        // then (期待する結果):
        assert_eq!(endpoints.subscribe.as_str(), "ws://127.0.0.1:8080/ws?pass=roomA");
        assert_eq!(
            endpoints.snapshot.as_str(),
            "http://127.0.0.1:8080/api/whiteboard/roomA"
        );
    }

    #[test]
    fn test_endpoints_escape_pass() {
        // テスト項目: pass に含まれる記号はエスケープされる
        // given (前提条件):
        let base = "https://example.com/";

        // when (操作):
        let endpoints = Endpoints::new(base, "a b/c").unwrap();

        // then (期待する結果):
        assert_eq!(endpoints.subscribe.as_str(), "wss://example.com/ws?pass=a+b%2Fc");
        assert_eq!(
            endpoints.snapshot.as_str(),
            "https://example.com/api/whiteboard/a%20b%2Fc"
        );
    }

    #[test]
    fn test_endpoints_reject_non_http_base() {
        // テスト項目: http / https 以外のベース URL はエラー
        // given (前提条件):
        let base = "ws://127.0.0.1:8080/ws";

        // when (操作):
        let result = Endpoints::new(base, "roomA");

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}
