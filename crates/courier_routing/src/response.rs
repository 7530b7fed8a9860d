use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Summary attached to the first feature of a routing response.
///
/// `orders` is the visiting sequence picked by the routing service and is never reordered.
/// Fields this crate does not interpret are kept in `extra` and passed back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "RouteSummary")]
pub struct RouteResponseSummary {
    pub orders: Vec<OrderLeg>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<StartDescriptor>,

    /// Always the delivery point of the terminal order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<OrderLeg>,

    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    pub order_id: i64,
    pub shipment_address: AddressWithCoords,
    pub delivery_address: AddressWithCoords,

    #[serde(default, alias = "Client")]
    pub client: Counterpart,

    #[serde(default, alias = "Manufacturer")]
    pub manufacturer: Counterpart,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Counterpart {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressWithCoords {
    pub lat: f64,
    pub lon: f64,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub street: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    #[schemars(with = "Option<String>")]
    pub building: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    #[schemars(with = "Option<String>")]
    pub flat: Option<String>,

    #[serde(default)]
    pub address_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StartDescriptor {
    /// Ad-hoc geocoded start
    Address(AddressStart),
    /// Start at the shipment point of an existing order
    Order(OrderLeg),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    #[default]
    Address,
}

/// Reverse-geocoded address, as produced by the geocoding service.
///
/// `coordinates` follows GeoJSON and holds `[lon, lat]`; use [`AddressStart::lat`] and
/// [`AddressStart::lon`] instead of indexing it. A trailing altitude is accepted and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressStart {
    #[serde(rename = "type")]
    pub kind: AddressKind,

    #[serde(deserialize_with = "lon_lat_position")]
    #[schemars(with = "Vec<f64>")]
    pub coordinates: [f64; 2],

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub street_address: Option<String>,
}

impl AddressStart {
    pub fn new(lat: f64, lon: f64, city: Option<String>, street_address: Option<String>) -> Self {
        AddressStart {
            kind: AddressKind::Address,
            coordinates: [lon, lat],
            city,
            street_address,
        }
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }
}

fn lon_lat_position<'de, D>(deserializer: D) -> Result<[f64; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let position = Vec::<f64>::deserialize(deserializer)?;

    match position.as_slice() {
        [lon, lat, ..] => Ok([*lon, *lat]),
        _ => Err(serde::de::Error::invalid_length(
            position.len(),
            &"a position with at least lon and lat",
        )),
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Integer(integer) => integer.to_string(),
            TextOrNumber::Float(float) => float.to_string(),
        }),
    )
}
