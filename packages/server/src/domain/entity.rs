//! Entity 定義
//!
//! - [`Stroke`]: ホワイトボードに永続化される 1 本の線
//! - [`RoomState`]: Room の現在の状態（`StrokeId` → `Stroke`）

use std::collections::HashMap;

use super::value_object::{ClientToken, Color, Point, StrokeId, StrokeWidth, Timestamp};

/// 永続化される Stroke
///
/// 点列の順序は描画パスそのものなので、常に受け取った順序のまま保持する。
/// 同じ `StrokeId` での再保存は丸ごと置き換えになる（点列のマージはしない）。
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub id: StrokeId,
    pub token: ClientToken,
    pub points: Vec<Point>,
    pub color: Color,
    pub width: StrokeWidth,
    pub timestamp: Timestamp,
    pub finished: bool,
}

impl Stroke {
    /// 完成済みの Stroke を作成する（ストアに入るのは完成済みの Stroke のみ）
    pub fn finished(
        id: StrokeId,
        token: ClientToken,
        points: Vec<Point>,
        color: Color,
        width: StrokeWidth,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            token,
            points,
            color,
            width,
            timestamp,
            finished: true,
        }
    }
}

/// Room の現在の状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomState {
    strokes: HashMap<StrokeId, Stroke>,
}

impl RoomState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stroke を挿入または置き換える。置き換えた場合は古い Stroke を返す。
    pub fn upsert(&mut self, stroke: Stroke) -> Option<Stroke> {
        self.strokes.insert(stroke.id.clone(), stroke)
    }

    pub fn get(&self, id: &StrokeId) -> Option<&Stroke> {
        self.strokes.get(id)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn into_strokes(self) -> impl Iterator<Item = Stroke> {
        self.strokes.into_values()
    }
}

impl FromIterator<Stroke> for RoomState {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        let mut state = Self::new();
        for stroke in iter {
            state.upsert(stroke);
        }
        state
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// テスト用の Stroke を作成
    pub fn stroke(id: &str, points: &[(f64, f64)]) -> Stroke {
        Stroke::finished(
            StrokeId::new(id.to_string()).unwrap(),
            ClientToken::new("tok1".to_string()).unwrap(),
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            Color::new("red".to_string()).unwrap(),
            StrokeWidth::new(2.0).unwrap(),
            Timestamp::new(1_000),
        )
    }
}
