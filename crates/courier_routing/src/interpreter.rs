use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::RouteError,
    markers::{
        Marker, address_start_marker, delivery_marker, end_marker, order_start_marker,
        shipment_marker,
    },
    response::{RouteResponseSummary, StartDescriptor},
};

const SUMMARY_POINTER: &str = "/features/0/properties/summary";
const GEOMETRY_POINTER: &str = "/features/0/geometry";

/// Markers derived from a summary, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub markers: Vec<Marker>,

    /// `Some(true)` when the route starts at an ad-hoc address and position-tracking markers
    /// should be hidden, `Some(false)` when they may be shown, `None` without a start.
    pub suppress_position_markers: Option<bool>,
}

/// Everything the caller needs to render a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDisplay {
    pub summary: RouteResponseSummary,
    pub geometry: Option<geojson::Geometry>,
    pub markers: Vec<Marker>,
    pub suppress_position_markers: Option<bool>,
}

pub fn interpret_summary(summary: &RouteResponseSummary) -> Interpretation {
    let mut markers = Vec::with_capacity(summary.orders.len() * 2 + 2);

    for leg in &summary.orders {
        markers.push(delivery_marker(leg));
        markers.push(shipment_marker(leg));
    }

    let suppress_position_markers = match &summary.start {
        Some(StartDescriptor::Address(start)) => {
            markers.push(address_start_marker(start));
            Some(true)
        }
        Some(StartDescriptor::Order(leg)) => {
            markers.push(order_start_marker(leg));
            Some(false)
        }
        None => None,
    };

    if let Some(end) = &summary.end {
        markers.push(end_marker(end));
    }

    Interpretation {
        markers,
        suppress_position_markers,
    }
}

/// Interprets a raw routing service response.
///
/// The response must carry `features[0].properties.summary`, otherwise
/// [`RouteError::MalformedResponse`] is returned and no markers are produced.
pub fn interpret_response(response: &Value) -> Result<RouteDisplay, RouteError> {
    let summary = response.pointer(SUMMARY_POINTER).ok_or_else(|| {
        warn!("Routing response has no features[0].properties.summary");
        RouteError::MalformedResponse(String::from("missing features[0].properties.summary"))
    })?;

    let summary = RouteResponseSummary::deserialize(summary).map_err(|err| {
        warn!("Routing response summary does not match the expected shape: {}", err);
        RouteError::MalformedResponse(format!("invalid summary: {}", err))
    })?;

    let geometry = response
        .pointer(GEOMETRY_POINTER)
        .filter(|geometry| !geometry.is_null())
        .and_then(|geometry| match geojson::Geometry::deserialize(geometry) {
            Ok(geometry) => Some(geometry),
            Err(err) => {
                debug!("Ignoring unreadable route geometry: {}", err);
                None
            }
        });

    let Interpretation {
        markers,
        suppress_position_markers,
    } = interpret_summary(&summary);

    debug!(
        orders = summary.orders.len(),
        markers = markers.len(),
        "Interpreted routing response"
    );

    Ok(RouteDisplay {
        summary,
        geometry,
        markers,
        suppress_position_markers,
    })
}
