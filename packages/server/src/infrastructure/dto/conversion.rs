//! Conversion logic between DTOs and domain entities / use case commands.

use serde_json::Value;

use crate::{
    domain::{
        ClientToken, Color, Point, PointInput, RoomPass, RoomState, Stroke, StrokeId,
        StrokeWidth, ValidationErrors, ValueObjectError,
    },
    infrastructure::dto::http,
    usecase::{ClearWhiteboardCommand, SaveStrokeCommand},
};

// ========================================
// DTO → Domain / Command
// ========================================

/// Validate an optional field with `build`, recording failures under `field`.
fn required<T, V>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<T>,
    build: impl FnOnce(T) -> Result<V, ValueObjectError>,
) -> Option<V> {
    let Some(value) = value else {
        errors.missing(field);
        return None;
    };
    match build(value) {
        Ok(valid) => Some(valid),
        Err(e) => {
            errors.push(field, e);
            None
        }
    }
}

fn expect_string(value: Value) -> Result<String, ValueObjectError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ValueObjectError::NotAString),
    }
}

fn expect_number(value: &Value) -> Result<f64, ValueObjectError> {
    value.as_f64().ok_or(ValueObjectError::NotANumber)
}

fn parse_point(value: Value) -> Result<Point, ValueObjectError> {
    let input: PointInput =
        serde_json::from_value(value).map_err(|_| ValueObjectError::NotAPoint)?;
    Point::try_from(input)
}

/// `points` must be an array; each element is reported under `points.{i}`.
fn parse_points(errors: &mut ValidationErrors, value: Option<Value>) -> Option<Vec<Point>> {
    let items = match value {
        None => {
            errors.missing("points");
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push("points", ValueObjectError::NotAnArray);
            return None;
        }
    };

    let mut points = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match parse_point(item) {
            Ok(point) => points.push(point),
            Err(e) => errors.push(format!("points.{i}"), e),
        }
    }
    Some(points)
}

impl TryFrom<http::SaveStrokeRequest> for SaveStrokeCommand {
    type Error = ValidationErrors;

    fn try_from(dto: http::SaveStrokeRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let pass = required(&mut errors, "pass", dto.pass, |v| {
            expect_string(v).and_then(RoomPass::new)
        });
        let stroke_id = required(&mut errors, "strokeId", dto.stroke_id, |v| {
            expect_string(v).and_then(StrokeId::new)
        });
        let token = required(&mut errors, "token", dto.token, |v| {
            expect_string(v).and_then(ClientToken::new)
        });
        let color = required(&mut errors, "color", dto.color, |v| {
            expect_string(v).and_then(Color::new)
        });
        let width = required(&mut errors, "width", dto.width, |v| {
            expect_number(&v).and_then(StrokeWidth::new)
        });
        let points = parse_points(&mut errors, dto.points);

        match (pass, stroke_id, token, points, color, width) {
            (Some(pass), Some(stroke_id), Some(token), Some(points), Some(color), Some(width))
                if errors.is_empty() =>
            {
                Ok(Self {
                    pass,
                    stroke_id,
                    token,
                    points,
                    color,
                    width,
                })
            }
            _ => Err(errors),
        }
    }
}

impl TryFrom<http::ClearWhiteboardRequest> for ClearWhiteboardCommand {
    type Error = ValidationErrors;

    fn try_from(dto: http::ClearWhiteboardRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let pass = required(&mut errors, "pass", dto.pass, |v| {
            expect_string(v).and_then(RoomPass::new)
        });
        let token = required(&mut errors, "token", dto.token, |v| {
            expect_string(v).and_then(ClientToken::new)
        });

        match (pass, token) {
            (Some(pass), Some(token)) => Ok(Self { pass, token }),
            _ => Err(errors),
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Stroke> for http::StrokeDto {
    fn from(model: Stroke) -> Self {
        Self {
            points: model.points,
            color: model.color.as_str().to_string(),
            width: model.width.value(),
            timestamp: model.timestamp.value(),
            token: model.token.into_string(),
            finished: model.finished,
        }
    }
}

impl From<RoomState> for http::WhiteboardStateResponse {
    fn from(model: RoomState) -> Self {
        Self(
            model
                .into_strokes()
                .map(|stroke| (stroke.id.as_str().to_string(), stroke.into()))
                .collect(),
        )
    }
}
