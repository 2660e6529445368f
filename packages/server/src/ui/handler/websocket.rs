//! WebSocket subscription handler.
//!
//! `GET /ws?pass={pass}` で Room チャンネル（`whiteboard.{pass}`）、
//! `GET /ws` でレガシーのグローバルチャンネル（`whiteboard`）を購読する。
//! ソケットはサーバーからの配信専用で、クライアントから届くテキストは無視する。

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::{
    domain::{Channel, RoomPass, ValidationErrors},
    infrastructure::publisher::Subscription,
    ui::{error::ApiError, state::AppState},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    pub pass: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubscribeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let channel = match query.pass {
        Some(pass) => Channel::Room(RoomPass::new(pass).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.push("pass", e);
            ApiError::Validation(errors)
        })?),
        None => Channel::Legacy,
    };

    // アップグレード前に購読しておき、ハンドシェイク完了後の配信を取りこぼさない
    let subscription = state.publisher.subscribe(&channel).await;
    tracing::info!("Subscriber joined '{}'", channel);

    // ハンドシェイクが完了しなかった場合も購読を片付ける
    let publisher = state.publisher.clone();
    let failed_channel = channel.clone();
    Ok(ws
        .on_failed_upgrade(move |e| {
            tracing::warn!("WebSocket upgrade on '{}' failed: {}", failed_channel, e);
            tokio::spawn(async move { publisher.release(&failed_channel).await });
        })
        .on_upgrade(move |socket| handle_socket(socket, state, channel, subscription)))
}

/// Spawns a task that forwards frames from the subscription to the WebSocket sender.
///
/// 遅れて古いフレームを失った場合は警告を出して続行する。
fn pusher_loop(
    channel: Channel,
    mut subscription: Subscription,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match subscription.recv().await {
                Ok(frame) => {
                    if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Subscriber on '{}' lagged behind, {} event(s) skipped",
                        channel,
                        skipped
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    channel: Channel,
    subscription: Subscription,
) {
    let (sender, mut receiver) = socket.split();

    let channel_for_recv = channel.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", channel_for_recv, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!(
                        "Ignoring {} byte(s) of text from subscriber on '{}'",
                        text.len(),
                        channel_for_recv
                    );
                }
                Message::Close(_) => break,
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(channel.clone(), subscription, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            // 受信口が drop されるのを待ってから片付ける
            let _ = send_task.await;
        }
        _ = &mut send_task => recv_task.abort(),
    };

    state.publisher.release(&channel).await;
    tracing::info!("Subscriber left '{}'", channel);
}
