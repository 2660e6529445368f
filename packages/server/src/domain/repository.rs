//! RoomStore trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{RoomPass, RoomState, Stroke, StoreError};

/// Room Store trait
///
/// Room のパスフレーズから現在の Stroke 集合への key-value ストア。
/// 「ホワイトボードの現在の状態」の唯一の正となる情報源です。
///
/// ## 保証
///
/// - 単一インスタンスに対する read-after-write 一貫性
/// - 各操作はアトミック（書きかけの Stroke が読まれることはない）
/// - 同じ Room の異なる `StrokeId` への並行 upsert はデータを失わない
/// - 同じ `StrokeId` への並行 upsert はストアへの到着順で後勝ち
///   （バージョン管理はしない）
///
/// ## 依存性の逆転（DIP）
///
/// - UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Room の現在の状態を取得（存在しない・期限切れの Room は空の状態）
    async fn get(&self, pass: &RoomPass) -> Result<RoomState, StoreError>;

    /// Stroke を `stroke.id` をキーに挿入または丸ごと置き換え、Room の TTL をリセットする
    async fn upsert(&self, pass: &RoomPass, stroke: Stroke) -> Result<(), StoreError>;

    /// Room の状態を即座に削除する
    async fn clear(&self, pass: &RoomPass) -> Result<(), StoreError>;
}
