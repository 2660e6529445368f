//! Value Object 定義
//!
//! 入力値は必ずここのコンストラクタを通して検証されます。
//! 一度構築された Value Object は常に有効な値を保持します。

use std::{fmt, num::NonZeroUsize};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeSeq};

use super::error::ValueObjectError;

/// Room のパスフレーズの最大文字数
pub const MAX_PASS_LENGTH: usize = 50;

/// Room を識別するパスフレーズ（大文字・小文字を区別する）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomPass(String);

impl RoomPass {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty);
        }
        let length = value.chars().count();
        if length > MAX_PASS_LENGTH {
            return Err(ValueObjectError::TooLong {
                max: MAX_PASS_LENGTH,
                actual: length,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// RoomStore 上のキー（`whiteboard:{pass}`）
    pub fn store_key(&self) -> String {
        format!("whiteboard:{}", self.0)
    }
}

impl TryFrom<String> for RoomPass {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// クライアントが生成する Stroke の ID（Room 内で一意、upsert のキー）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StrokeId(String);

impl StrokeId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for StrokeId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// クライアント（セッション）を識別する不透明なトークン
///
/// 作者の識別にのみ使い、書き込みの認可には使わない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientToken(String);

impl ClientToken {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientToken {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stroke の色（CSS の色表現をそのまま保持する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stroke の線幅
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StrokeWidth(f64);

impl StrokeWidth {
    pub fn new(value: f64) -> Result<Self, ValueObjectError> {
        if !value.is_finite() {
            return Err(ValueObjectError::NotFinite);
        }
        if value < 0.0 {
            return Err(ValueObjectError::Negative);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Stroke を構成する 1 点
///
/// 座標と任意の筆圧を持つ。シリアライズ時は常に `[x, y]` または
/// `[x, y, pressure]` の配列になる。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "PointInput")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub pressure: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pressure: None,
        }
    }

    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            x,
            y,
            pressure: Some(pressure),
        }
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.pressure.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.x)?;
        seq.serialize_element(&self.y)?;
        if let Some(pressure) = self.pressure {
            seq.serialize_element(&pressure)?;
        }
        seq.end()
    }
}

/// クライアントから受け取る点の表現
///
/// `[x, y]`, `[x, y, pressure]`, `{"x": .., "y": .., "pressure": ..}` を受け付ける。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointInput {
    Array(Vec<f64>),
    Object {
        x: f64,
        y: f64,
        #[serde(default)]
        pressure: Option<f64>,
    },
}

impl TryFrom<PointInput> for Point {
    type Error = ValueObjectError;

    fn try_from(input: PointInput) -> Result<Self, Self::Error> {
        let point = match input {
            PointInput::Array(values) => match values.as_slice() {
                [x, y] => Point::new(*x, *y),
                [x, y, pressure] => Point::with_pressure(*x, *y, *pressure),
                other => return Err(ValueObjectError::PointArity(other.len())),
            },
            PointInput::Object { x, y, pressure } => Point { x, y, pressure },
        };

        let finite = point.x.is_finite()
            && point.y.is_finite()
            && point.pressure.is_none_or(f64::is_finite);
        if !finite {
            return Err(ValueObjectError::NotFinite);
        }
        Ok(point)
    }
}

/// サーバーが付与する Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 1 チャンクあたりの最大点数（0 は設定エラー）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize(NonZeroUsize);

impl ChunkSize {
    pub fn new(value: usize) -> Result<Self, ValueObjectError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(ValueObjectError::Zero)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(super::chunker::DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}
