use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use serde_json::Value;
use tokio::sync::Notify;

use crate::{
    client::RouteService,
    error::RouteError,
    request::RouteRequest,
    response::{AddressWithCoords, Counterpart, OrderLeg},
};

pub fn route_response_fixture() -> Value {
    serde_json::from_str(include_str!("../fixtures/route_response.json")).unwrap()
}

pub fn order_leg(order_id: i64, manufacturer: &str, client: &str) -> OrderLeg {
    let offset = order_id as f64 / 100.0;

    OrderLeg {
        order_id,
        shipment_address: AddressWithCoords {
            lat: 60.0 + offset,
            lon: 24.0 + offset,
            city: Some(String::from("Vantaa")),
            street: Some(String::from("Shipment street")),
            building: Some(String::from("1")),
            flat: None,
            address_id: Some(order_id * 10),
        },
        delivery_address: AddressWithCoords {
            lat: 61.0 + offset,
            lon: 25.0 + offset,
            city: Some(String::from("Lahti")),
            street: Some(String::from("Delivery street")),
            building: Some(String::from("2")),
            flat: Some(String::from("14")),
            address_id: Some(order_id * 10 + 1),
        },
        client: Counterpart {
            name: Some(client.to_owned()),
        },
        manufacturer: Counterpart {
            name: Some(manufacturer.to_owned()),
        },
    }
}

/// Routing service stand-in. A gated service holds every request until `release` is notified.
pub struct FakeRouteService {
    response: Result<Value, RouteError>,
    release: Option<Arc<Notify>>,
    pub calls: AtomicUsize,
}

impl FakeRouteService {
    pub fn responding(response: Value) -> Self {
        FakeRouteService {
            response: Ok(response),
            release: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: RouteError) -> Self {
        FakeRouteService {
            response: Err(error),
            release: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(response: Value, release: Arc<Notify>) -> Self {
        FakeRouteService {
            response: Ok(response),
            release: Some(release),
            calls: AtomicUsize::new(0),
        }
    }
}

impl RouteService for FakeRouteService {
    async fn request_route(&self, _request: &RouteRequest) -> Result<Value, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(release) = &self.release {
            release.notified().await;
        }

        self.response.clone()
    }
}
