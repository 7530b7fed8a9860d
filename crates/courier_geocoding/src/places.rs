use courier_routing::response::AddressStart;
use geojson::{Feature, FeatureCollection, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One geocoding hit, trimmed down to the fields the address pickers show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub name: Option<String>,
    pub street: Option<String>,
    pub housenumber: Option<String>,
    pub postalcode: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub macroregion: Option<String>,
    pub region: Option<String>,
    pub label: Option<String>,
    pub coordinates: Coordinates,
}

impl PlaceSuggestion {
    /// Selection value understood by the endpoint resolver.
    pub fn to_position_selection(&self) -> Value {
        json!({
            "type": "position",
            "lat": self.coordinates.lat,
            "lon": self.coordinates.lon,
        })
    }
}

/// Converts search or autocomplete results. Features without a point geometry are skipped.
pub fn parse_places(collection: &FeatureCollection) -> Vec<PlaceSuggestion> {
    collection
        .features
        .iter()
        .filter_map(|feature| {
            let Some(coordinates) = point_coordinates(feature) else {
                debug!("Skipping geocoding feature without a point geometry");
                return None;
            };
            let properties = feature.properties.as_ref();

            Some(PlaceSuggestion {
                name: property(properties, "name"),
                street: property(properties, "street"),
                housenumber: property(properties, "housenumber"),
                postalcode: property(properties, "postalcode"),
                county: property(properties, "county"),
                country: property(properties, "country"),
                macroregion: property(properties, "macroregion"),
                region: property(properties, "region"),
                label: property(properties, "label"),
                coordinates,
            })
        })
        .collect()
}

const GEOJSON_PROPERTIES: [&str; 5] = ["street", "housenumber", "postalcode", "county", "country"];

/// Trims a search result down to a FeatureCollection for map layers.
///
/// Geometries are kept as returned. Only the address properties survive, missing ones as null.
pub fn parse_geojson(collection: &FeatureCollection) -> FeatureCollection {
    let features = collection
        .features
        .iter()
        .map(|feature| {
            let properties = feature.properties.as_ref();

            let trimmed: JsonObject = GEOJSON_PROPERTIES
                .iter()
                .map(|&key| {
                    let value = property(properties, key).map_or(Value::Null, Value::String);
                    (key.to_owned(), value)
                })
                .collect();

            Feature {
                bbox: None,
                geometry: feature.geometry.clone(),
                id: None,
                properties: Some(trimmed),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Reads the best reverse geocoding hit as an ad-hoc route start.
///
/// The place `name` becomes the street address and the `county` the city.
pub fn parse_reverse_geocode(collection: &FeatureCollection) -> Option<AddressStart> {
    let feature = collection.features.first()?;
    let coordinates = point_coordinates(feature)?;
    let properties = feature.properties.as_ref();

    Some(AddressStart::new(
        coordinates.lat,
        coordinates.lon,
        property(properties, "county"),
        property(properties, "name"),
    ))
}

fn point_coordinates(feature: &Feature) -> Option<Coordinates> {
    match &feature.geometry.as_ref()?.value {
        geojson::Value::Point(position) if position.len() >= 2 => Some(Coordinates {
            lon: position[0],
            lat: position[1],
        }),
        _ => None,
    }
}

fn property(properties: Option<&JsonObject>, key: &str) -> Option<String> {
    match properties?.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(value: Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    fn kaivokatu() -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [24.9414, 60.1712] },
            "properties": {
                "name": "Kaivokatu 1",
                "street": "Kaivokatu",
                "housenumber": "1",
                "postalcode": "00100",
                "county": "Helsinki",
                "country": "Finland",
                "region": "Uusimaa",
                "label": "Kaivokatu 1, Helsinki, Finland"
            }
        })
    }

    #[test]
    fn test_reverse_geocode_maps_name_and_county() {
        let features = collection(json!({
            "type": "FeatureCollection",
            "features": [kaivokatu()]
        }));

        let start = parse_reverse_geocode(&features).unwrap();

        assert_eq!(start.street_address.as_deref(), Some("Kaivokatu 1"));
        assert_eq!(start.city.as_deref(), Some("Helsinki"));
        assert_eq!(start.coordinates, [24.9414, 60.1712]);
        assert_eq!(start.lat(), 60.1712);
        assert_eq!(
            serde_json::to_value(&start).unwrap()["type"],
            json!("address")
        );
    }

    #[test]
    fn test_reverse_geocode_without_hits() {
        let features = collection(json!({ "type": "FeatureCollection", "features": [] }));

        assert_eq!(parse_reverse_geocode(&features), None);
    }

    #[test]
    fn test_parse_places_skips_features_without_points() {
        let features = collection(json!({
            "type": "FeatureCollection",
            "features": [
                kaivokatu(),
                { "type": "Feature", "geometry": null, "properties": { "name": "Nowhere" } }
            ]
        }));

        let places = parse_places(&features);

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].postalcode.as_deref(), Some("00100"));
        assert_eq!(places[0].macroregion, None);
        assert_eq!(
            places[0].coordinates,
            Coordinates {
                lat: 60.1712,
                lon: 24.9414
            }
        );
    }

    #[test]
    fn test_parse_geojson_keeps_address_properties() {
        let features = collection(json!({
            "type": "FeatureCollection",
            "bbox": [24.0, 60.0, 25.0, 61.0],
            "features": [
                kaivokatu(),
                { "type": "Feature", "geometry": null, "properties": { "name": "Nowhere" } }
            ]
        }));

        let trimmed = serde_json::to_value(parse_geojson(&features)).unwrap();

        assert_eq!(trimmed["type"], json!("FeatureCollection"));
        assert_eq!(trimmed["features"].as_array().unwrap().len(), 2);
        assert_eq!(
            trimmed["features"][0]["properties"],
            json!({
                "street": "Kaivokatu",
                "housenumber": "1",
                "postalcode": "00100",
                "county": "Helsinki",
                "country": "Finland"
            })
        );
        assert_eq!(
            trimmed["features"][0]["geometry"]["coordinates"],
            json!([24.9414, 60.1712])
        );
        assert_eq!(trimmed["features"][1]["properties"]["street"], Value::Null);
        assert_eq!(trimmed["features"][1]["geometry"], Value::Null);
    }

    #[test]
    fn test_suggestion_resolves_to_position() {
        let features = collection(json!({
            "type": "FeatureCollection",
            "features": [kaivokatu()]
        }));
        let place = &parse_places(&features)[0];

        let endpoint =
            courier_routing::endpoint::resolve_endpoint(Some(&place.to_position_selection()));

        assert_eq!(
            endpoint,
            courier_routing::endpoint::Endpoint::Position {
                lat: 60.1712,
                lon: 24.9414
            }
        );
    }
}
