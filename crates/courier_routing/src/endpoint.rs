use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

// i64::MAX rounds up to 2^63 as a float, which is already out of range
const I64_FLOAT_RANGE: std::ops::Range<f64> = i64::MIN as f64..i64::MAX as f64;

/// A routing terminus (start or end) picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Endpoint {
    #[default]
    Unset,
    /// The shipment or delivery address of an existing order
    OrderReference { order_id: i64 },
    /// A geocoded point or the user's current position
    Position { lat: f64, lon: f64 },
}

/// What the routing service expects for `start` / `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum EndpointWire {
    OrderId(i64),
    /// `[lon, lat]`
    Coordinates([f64; 2]),
}

impl Endpoint {
    pub fn is_unset(&self) -> bool {
        matches!(self, Endpoint::Unset)
    }

    pub fn point(&self) -> Option<geo_types::Point> {
        match *self {
            Endpoint::Position { lat, lon } => Some(geo_types::Point::new(lon, lat)),
            _ => None,
        }
    }

    /// `None` means the field must be left out of the request entirely.
    pub fn to_wire(&self) -> Option<EndpointWire> {
        match *self {
            Endpoint::Unset => None,
            Endpoint::OrderReference { order_id } => Some(EndpointWire::OrderId(order_id)),
            Endpoint::Position { .. } => self
                .point()
                .map(|point| EndpointWire::Coordinates([point.x(), point.y()])),
        }
    }
}

/// Turns an address-like selection into an [`Endpoint`].
///
/// Rules are applied in order and the first match wins:
/// an absent or null value is unset, an `orderId` field makes an order reference,
/// `type == "position"` makes a position from `lat`/`lon`. Any other shape is unset.
///
/// A selection that matches a rule but carries unusable values is also unset: an `orderId`
/// that is not an integer in the `i64` range, or a position without numeric `lat` and `lon`.
/// Those cases are logged at warn level.
pub fn resolve_endpoint(selection: Option<&Value>) -> Endpoint {
    let Some(object) = selection.and_then(Value::as_object) else {
        if selection.is_some_and(|value| !value.is_null()) {
            debug!("Endpoint selection is not an object, leaving endpoint unset");
        }
        return Endpoint::Unset;
    };

    if let Some(order_id) = object.get("orderId") {
        return match as_integer(order_id) {
            Some(order_id) => Endpoint::OrderReference { order_id },
            None => {
                warn!(%order_id, "Endpoint selection has an unusable orderId, leaving endpoint unset");
                Endpoint::Unset
            }
        };
    }

    if object.get("type").and_then(Value::as_str) == Some("position") {
        let lat = object.get("lat").and_then(as_coordinate);
        let lon = object.get("lon").and_then(as_coordinate);

        return match (lat, lon) {
            (Some(lat), Some(lon)) => Endpoint::Position { lat, lon },
            _ => {
                warn!("Position selection is missing lat/lon, leaving endpoint unset");
                Endpoint::Unset
            }
        };
    }

    debug!("Unrecognized endpoint selection, leaving endpoint unset");
    Endpoint::Unset
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && I64_FLOAT_RANGE.contains(float))
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_coordinate(value: &Value) -> Option<f64> {
    let coordinate = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };

    coordinate.filter(|coordinate| coordinate.is_finite())
}
