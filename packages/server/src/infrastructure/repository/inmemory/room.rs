//! InMemory Room Store 実装
//!
//! ドメイン層が定義する RoomStore trait の具体的な実装。
//! HashMap をインメモリの key-value ストアとして使用し、キーは `whiteboard:{pass}`。
//!
//! ## TTL
//!
//! - Room ごとに「最後の書き込みから TTL」で期限切れになる
//! - 期限切れの Room は `get` から即座に見えなくなる（遅延判定）
//! - メモリの解放は `purge_expired` で行い、`spawn_reaper` がそれを定期実行する
//! - 時刻は注入された `Clock` から取得するので、テストで時間を進められる

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use async_trait::async_trait;
use kokuban_shared::time::Clock;
use tokio::{sync::Mutex, task::JoinHandle, time::MissedTickBehavior};

use crate::domain::{RoomPass, RoomState, RoomStore, StoreError, Stroke};

/// Room の状態を保持する期間（最後の書き込みから 24 時間）
pub const DEFAULT_ROOM_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// ストア内の 1 Room 分のエントリ
#[derive(Debug)]
struct RoomEntry {
    state: RoomState,
    /// 期限（Unix ミリ秒）。この時刻以降は存在しないものとして扱う
    expires_at: i64,
}

impl RoomEntry {
    fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// インメモリ Room Store 実装
pub struct InMemoryRoomStore {
    /// Key: `whiteboard:{pass}`
    rooms: Mutex<HashMap<String, RoomEntry>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl InMemoryRoomStore {
    /// 新しい InMemoryRoomStore を作成
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
            ttl,
        }
    }

    /// TTL 24 時間の InMemoryRoomStore を作成
    pub fn with_default_ttl(clock: Arc<dyn Clock>) -> Self {
        Self::new(clock, DEFAULT_ROOM_TTL)
    }

    /// 期限切れの Room を削除し、削除した件数を返す
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut rooms = self.rooms.lock().await;
        let before = rooms.len();
        rooms.retain(|_, entry| !entry.is_expired(now));
        before - rooms.len()
    }

    /// 期限内の Room の数
    pub async fn room_count(&self) -> usize {
        let now = self.clock.now_millis();
        let rooms = self.rooms.lock().await;
        rooms.values().filter(|entry| !entry.is_expired(now)).count()
    }

    /// `purge_expired` を `interval` ごとに実行するタスクを起動する
    ///
    /// ストアが drop されるとタスクも終了する。
    pub fn spawn_reaper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 最初の tick は即座に完了するので読み捨てる
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    tracing::debug!("Room store dropped, stopping reaper");
                    break;
                };
                let purged = store.purge_expired().await;
                if purged > 0 {
                    tracing::info!("Purged {} expired room(s)", purged);
                }
            }
        })
    }

    fn expires_at(&self, now: i64) -> i64 {
        let ttl_millis = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        now.saturating_add(ttl_millis)
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn get(&self, pass: &RoomPass) -> Result<RoomState, StoreError> {
        let key = pass.store_key();
        let now = self.clock.now_millis();
        let mut rooms = self.rooms.lock().await;

        match rooms.get(&key) {
            Some(entry) if entry.is_expired(now) => {
                rooms.remove(&key);
                tracing::debug!("Room '{}' expired on read", key);
                Ok(RoomState::new())
            }
            Some(entry) => Ok(entry.state.clone()),
            None => Ok(RoomState::new()),
        }
    }

    async fn upsert(&self, pass: &RoomPass, stroke: Stroke) -> Result<(), StoreError> {
        let key = pass.store_key();
        let now = self.clock.now_millis();
        let expires_at = self.expires_at(now);
        let mut rooms = self.rooms.lock().await;

        let entry = rooms.entry(key).or_insert_with(|| RoomEntry {
            state: RoomState::new(),
            expires_at,
        });
        // 期限切れの Room に書き込む場合は古い Stroke を復活させない
        if entry.is_expired(now) {
            entry.state = RoomState::new();
        }
        entry.state.upsert(stroke);
        entry.expires_at = expires_at;
        Ok(())
    }

    async fn clear(&self, pass: &RoomPass) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(&pass.store_key());
        Ok(())
    }
}
