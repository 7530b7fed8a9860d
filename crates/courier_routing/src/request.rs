use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    endpoint::{Endpoint, EndpointWire},
    error::RouteError,
};

/// Routing options from the route form. Passed explicitly to the builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    pub is_center_avoided: bool,
    pub is_traffic_situation: bool,
}

/// Fuel usage as entered by the user. It is sent as given, either as a number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FuelUsage {
    Number(f64),
    Text(String),
}

impl Default for FuelUsage {
    fn default() -> Self {
        FuelUsage::Text(String::new())
    }
}

impl From<f64> for FuelUsage {
    fn from(value: f64) -> Self {
        FuelUsage::Number(value)
    }
}

impl From<String> for FuelUsage {
    fn from(value: String) -> Self {
        FuelUsage::Text(value)
    }
}

impl From<&str> for FuelUsage {
    fn from(value: &str) -> Self {
        FuelUsage::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", rename = "RouteRequest")]
pub struct RouteRequest {
    pub order_ids: Vec<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EndpointWire>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EndpointWire>,

    #[serde(rename = "fuelusage")]
    pub fuel_usage: FuelUsage,

    pub is_center_avoided: bool,
    pub is_traffic_situation: bool,
}

#[derive(Default)]
pub struct RouteRequestBuilder {
    order_ids: Vec<i64>,
    start: Endpoint,
    end: Endpoint,
    fuel_usage: Option<FuelUsage>,
    options: RouteOptions,
}

impl RouteRequestBuilder {
    pub fn set_order_ids(&mut self, order_ids: Vec<i64>) -> &mut RouteRequestBuilder {
        self.order_ids = order_ids;
        self
    }

    pub fn set_start(&mut self, start: Endpoint) -> &mut RouteRequestBuilder {
        self.start = start;
        self
    }

    pub fn set_end(&mut self, end: Endpoint) -> &mut RouteRequestBuilder {
        self.end = end;
        self
    }

    pub fn set_fuel_usage(&mut self, fuel_usage: impl Into<FuelUsage>) -> &mut RouteRequestBuilder {
        self.fuel_usage = Some(fuel_usage.into());
        self
    }

    pub fn set_options(&mut self, options: RouteOptions) -> &mut RouteRequestBuilder {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<RouteRequest, RouteError> {
        if self.order_ids.is_empty() {
            return Err(RouteError::EmptySelection);
        }

        Ok(RouteRequest {
            order_ids: self.order_ids,
            start: self.start.to_wire(),
            end: self.end.to_wire(),
            fuel_usage: self.fuel_usage.unwrap_or_default(),
            is_center_avoided: self.options.is_center_avoided,
            is_traffic_situation: self.options.is_traffic_situation,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut builder = RouteRequestBuilder::default();
        builder
            .set_start(Endpoint::OrderReference { order_id: 1 })
            .set_fuel_usage("7");

        assert_eq!(builder.build(), Err(RouteError::EmptySelection));
    }

    #[test]
    fn test_position_start_and_unset_end() {
        let mut builder = RouteRequestBuilder::default();
        builder
            .set_order_ids(vec![1, 2])
            .set_start(Endpoint::Position {
                lat: 60.0,
                lon: 24.0,
            })
            .set_end(Endpoint::Unset)
            .set_fuel_usage("7")
            .set_options(RouteOptions {
                is_center_avoided: true,
                is_traffic_situation: false,
            });

        let body = serde_json::to_value(builder.build().unwrap()).unwrap();

        assert_eq!(
            body,
            json!({
                "orderIds": [1, 2],
                "start": [24.0, 60.0],
                "fuelusage": "7",
                "isCenterAvoided": true,
                "isTrafficSituation": false
            })
        );
        assert!(body.get("end").is_none());
    }

    #[test]
    fn test_order_reference_end_is_a_bare_id() {
        let mut builder = RouteRequestBuilder::default();
        builder
            .set_order_ids(vec![4])
            .set_end(Endpoint::OrderReference { order_id: 4 })
            .set_fuel_usage(6.5);

        let body = serde_json::to_string(&builder.build().unwrap()).unwrap();

        assert!(body.contains(r#""end":4"#));
        assert!(body.contains(r#""fuelusage":6.5"#));
        assert!(!body.contains(r#""start""#));
    }
}
