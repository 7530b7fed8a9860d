use std::fmt::{Display, Write};

use serde::Serialize;

use crate::response::{AddressStart, AddressWithCoords, OrderLeg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarkerRole {
    Start,
    End,
    /// Delivery point of an order
    Client,
    /// Shipment point of an order
    Manufacturer,
}

impl MarkerRole {
    fn color(&self) -> &'static str {
        match self {
            MarkerRole::Start => "green",
            MarkerRole::End => "red",
            MarkerRole::Client => "blue",
            MarkerRole::Manufacturer => "orange",
        }
    }
}

impl Display for MarkerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MarkerRole::Start => "Start",
                MarkerRole::End => "End",
                MarkerRole::Client => "Client",
                MarkerRole::Manufacturer => "Manufacturer",
            }
        )
    }
}

/// A marker-placement instruction for the map layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub html_label: String,
    pub role: MarkerRole,
}

/// Receives markers in the order they must be drawn. Later markers may overlay earlier ones.
pub trait MarkerEmitter {
    fn emit(&mut self, lat: f64, lon: f64, html_label: &str, role: MarkerRole);
}

impl MarkerEmitter for Vec<Marker> {
    fn emit(&mut self, lat: f64, lon: f64, html_label: &str, role: MarkerRole) {
        self.push(Marker {
            lat,
            lon,
            html_label: html_label.to_owned(),
            role,
        });
    }
}

pub fn emit_markers(markers: &[Marker], emitter: &mut impl MarkerEmitter) {
    for marker in markers {
        emitter.emit(marker.lat, marker.lon, &marker.html_label, marker.role);
    }
}

pub(crate) fn delivery_marker(leg: &OrderLeg) -> Marker {
    let address = &leg.delivery_address;
    let mut label = LabelBuilder::new(MarkerRole::Client);
    label
        .name(leg.client.name.as_deref())
        .line("Order", leg.order_id)
        .address(address)
        .line("Flat", text(&address.flat));

    address_marker(address, label.finish(), MarkerRole::Client)
}

pub(crate) fn shipment_marker(leg: &OrderLeg) -> Marker {
    let address = &leg.shipment_address;
    let mut label = LabelBuilder::new(MarkerRole::Manufacturer);
    label
        .name(leg.manufacturer.name.as_deref())
        .line("Order", leg.order_id)
        .address(address);

    address_marker(address, label.finish(), MarkerRole::Manufacturer)
}

pub(crate) fn order_start_marker(leg: &OrderLeg) -> Marker {
    let address = &leg.shipment_address;
    let mut label = LabelBuilder::new(MarkerRole::Start);
    label
        .name(leg.manufacturer.name.as_deref())
        .line("Order", leg.order_id)
        .address(address);

    address_marker(address, label.finish(), MarkerRole::Start)
}

pub(crate) fn address_start_marker(start: &AddressStart) -> Marker {
    let mut label = LabelBuilder::new(MarkerRole::Start);
    label
        .line("City", text(&start.city))
        .line("Street", text(&start.street_address));

    Marker {
        lat: start.lat(),
        lon: start.lon(),
        html_label: label.finish(),
        role: MarkerRole::Start,
    }
}

pub(crate) fn end_marker(leg: &OrderLeg) -> Marker {
    let address = &leg.delivery_address;
    let mut label = LabelBuilder::new(MarkerRole::End);
    label
        .name(leg.client.name.as_deref())
        .line("Order", leg.order_id)
        .address(address);

    address_marker(address, label.finish(), MarkerRole::End)
}

fn address_marker(address: &AddressWithCoords, html_label: String, role: MarkerRole) -> Marker {
    Marker {
        lat: address.lat,
        lon: address.lon,
        html_label,
        role,
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

struct LabelBuilder {
    html: String,
}

impl LabelBuilder {
    fn new(role: MarkerRole) -> Self {
        LabelBuilder {
            html: format!(r#"<b style="color:{}">{}</b><br />"#, role.color(), role),
        }
    }

    fn name(&mut self, name: Option<&str>) -> &mut Self {
        let _ = write!(self.html, "<b>{}</b><br />", escape_html(name.unwrap_or_default()));
        self
    }

    fn line(&mut self, key: &str, value: impl Display) -> &mut Self {
        let value = escape_html(&value.to_string());
        let _ = write!(self.html, "{}: {}<br />", key, value);
        self
    }

    fn address(&mut self, address: &AddressWithCoords) -> &mut Self {
        let street = match (&address.street, &address.building) {
            (Some(street), Some(building)) => format!("{} {}", street, building),
            (Some(street), None) => street.clone(),
            (None, Some(building)) => building.clone(),
            (None, None) => String::new(),
        };

        self.line("City", text(&address.city)).line("Street", street)
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.html)
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
