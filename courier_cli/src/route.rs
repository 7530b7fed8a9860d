use clap::Args;
use courier_routing::{
    client::{RoutingClient, RoutingClientParams},
    endpoint::Endpoint,
    form::{RouteForm, SubmitOutcome},
    markers::Marker,
    request::RouteOptions,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{marker_table::print_markers, parsers};

#[derive(Args)]
pub struct RouteArgs {
    /// Order ids to route, comma separated
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    orders: Vec<i64>,

    /// Start selection as JSON, e.g. '{"orderId": 3}' or '{"type": "position", "lat": 60.17, "lon": 24.94}'
    #[arg(long, value_parser = parsers::parse_selection)]
    start: Option<Value>,

    /// End selection as JSON, same shapes as --start
    #[arg(long, value_parser = parsers::parse_selection)]
    end: Option<Value>,

    /// Fuel usage of the vehicle, sent as entered
    #[arg(short, long, default_value = "0")]
    fuel_usage: String,

    #[arg(long)]
    avoid_center: bool,

    /// Take the current traffic situation into account
    #[arg(long)]
    traffic: bool,

    #[arg(short, long, value_parser = parsers::parse_timeout)]
    timeout: Option<jiff::SignedDuration>,

    /// Print the request body instead of sending it
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: RouteArgs) -> anyhow::Result<()> {
    let mut params = RoutingClientParams::from_env();
    if let Some(timeout) = args.timeout {
        params.timeout = timeout.unsigned_abs();
    }

    let mut form = RouteForm::new(RoutingClient::new(params)?);
    form.set_order_ids(args.orders);
    form.set_fuel_usage(args.fuel_usage);
    form.set_options(RouteOptions {
        is_center_avoided: args.avoid_center,
        is_traffic_situation: args.traffic,
    });

    let start = form.select_start(args.start.as_ref());
    let end = form.select_end(args.end.as_ref());
    for (name, selection, endpoint) in [("start", &args.start, start), ("end", &args.end, end)] {
        if is_dropped_selection(selection.as_ref(), endpoint) {
            warn!("--{} {} was not understood, routing without it", name, selection_text(selection.as_ref()));
        }
    }
    info!("Route start: {:?}, end: {:?}", start, end);

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&form.build_request()?)?);
        return Ok(());
    }

    let mut markers: Vec<Marker> = Vec::new();

    match form.submit(&mut markers).await? {
        SubmitOutcome::Rendered(display) => {
            print_markers(&markers);

            if let Some(suppress) = display.suppress_position_markers {
                info!("Position tracking markers suppressed: {}", suppress);
            }
            if display.geometry.is_none() {
                warn!("Routing response carried no route geometry");
            }
        }
        SubmitOutcome::Discarded => warn!("Route submission was discarded"),
    }

    Ok(())
}

/// A non-null selection that still resolved to an unset endpoint.
fn is_dropped_selection(selection: Option<&Value>, endpoint: Endpoint) -> bool {
    selection.is_some_and(|value| !value.is_null()) && endpoint.is_unset()
}

fn selection_text(selection: Option<&Value>) -> String {
    selection.map(Value::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use courier_routing::endpoint::resolve_endpoint;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_is_dropped_selection() {
        let unusable = json!({ "orderId": "abc" });
        let order = json!({ "orderId": 3 });

        assert!(is_dropped_selection(
            Some(&unusable),
            resolve_endpoint(Some(&unusable))
        ));
        assert!(!is_dropped_selection(Some(&order), resolve_endpoint(Some(&order))));
        assert!(!is_dropped_selection(None, Endpoint::Unset));
        assert!(!is_dropped_selection(Some(&Value::Null), Endpoint::Unset));
    }
}
