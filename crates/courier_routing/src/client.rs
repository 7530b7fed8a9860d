use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{error::RouteError, request::RouteRequest};

pub const ROUTING_URL_ENV_VAR: &str = "COURIER_ROUTING_URL";
pub const ROUTING_TIMEOUT_ENV_VAR: &str = "COURIER_ROUTING_TIMEOUT_SECS";

pub const DEFAULT_ROUTING_URL: &str = "http://localhost:8081";
pub const ROUTING_ORDERS_API_PATH: &str = "/api/v1/routing/orders";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport to the routing service.
///
/// Implementations do not retry.
pub trait RouteService {
    fn request_route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<Value, RouteError>> + Send;
}

#[derive(Debug, Clone)]
pub struct RoutingClientParams {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RoutingClientParams {
    fn default() -> Self {
        RoutingClientParams {
            base_url: String::from(DEFAULT_ROUTING_URL),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RoutingClientParams {
    pub fn from_env() -> Self {
        let mut params = RoutingClientParams::default();

        if let Ok(base_url) = std::env::var(ROUTING_URL_ENV_VAR) {
            params.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var(ROUTING_TIMEOUT_ENV_VAR) {
            match timeout.parse::<u64>() {
                Ok(seconds) => params.timeout = Duration::from_secs(seconds),
                Err(_) => warn!(
                    "Ignoring invalid {}={}, using {}s",
                    ROUTING_TIMEOUT_ENV_VAR,
                    timeout,
                    DEFAULT_TIMEOUT.as_secs()
                ),
            }
        }

        params
    }

    pub fn orders_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            ROUTING_ORDERS_API_PATH
        )
    }
}

pub struct RoutingClient {
    params: RoutingClientParams,
    client: reqwest::Client,
}

impl RoutingClient {
    pub fn new(params: RoutingClientParams) -> Result<Self, RouteError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self { params, client })
    }

    #[instrument(skip_all, level = "debug", fields(orders = request.order_ids.len()))]
    pub async fn fetch_route(&self, request: &RouteRequest) -> Result<Value, RouteError> {
        let response = self
            .client
            .post(self.params.orders_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!("RoutingClient: received response with status {}", status);

        handle_response(status, &body)
    }
}

/// Non-2xx answers and bodies that are not JSON are both malformed responses.
fn handle_response(status: StatusCode, body: &str) -> Result<Value, RouteError> {
    if !status.is_success() {
        warn!("RoutingClient: routing service answered {}", status);
        return Err(RouteError::MalformedResponse(format!(
            "status {}: {}",
            status.as_u16(),
            body
        )));
    }

    serde_json::from_str(body).map_err(|err| {
        RouteError::MalformedResponse(format!("status {}: invalid JSON body: {}", status.as_u16(), err))
    })
}

impl RouteService for RoutingClient {
    fn request_route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<Value, RouteError>> + Send {
        self.fetch_route(request)
    }
}
