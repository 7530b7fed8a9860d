use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    client::RouteService,
    endpoint::{Endpoint, resolve_endpoint},
    error::RouteError,
    interpreter::{RouteDisplay, interpret_response},
    markers::{MarkerEmitter, emit_markers},
    request::{FuelUsage, RouteOptions, RouteRequest, RouteRequestBuilder},
};

#[derive(Debug)]
pub enum SubmitOutcome {
    Rendered(RouteDisplay),
    /// The form was torn down while the request was in flight, nothing was emitted
    Discarded,
}

/// Marks a [`RouteForm`] as gone. Can be held by whoever owns the view.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    torn_down: Arc<AtomicBool>,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::Release);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// State behind the "show route" form.
///
/// Start and end are resolved independently on every selection change. Only one
/// submission may be in flight at a time.
pub struct RouteForm<S> {
    service: S,
    order_ids: Vec<i64>,
    start: Endpoint,
    end: Endpoint,
    fuel_usage: FuelUsage,
    options: RouteOptions,
    in_flight: AtomicBool,
    teardown: TeardownHandle,
}

impl<S: RouteService> RouteForm<S> {
    pub fn new(service: S) -> Self {
        RouteForm {
            service,
            order_ids: Vec::new(),
            start: Endpoint::Unset,
            end: Endpoint::Unset,
            fuel_usage: FuelUsage::default(),
            options: RouteOptions::default(),
            in_flight: AtomicBool::new(false),
            teardown: TeardownHandle {
                torn_down: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    pub fn select_start(&mut self, selection: Option<&Value>) -> Endpoint {
        self.start = resolve_endpoint(selection);
        self.start
    }

    pub fn select_end(&mut self, selection: Option<&Value>) -> Endpoint {
        self.end = resolve_endpoint(selection);
        self.end
    }

    pub fn start(&self) -> Endpoint {
        self.start
    }

    pub fn end(&self) -> Endpoint {
        self.end
    }

    pub fn set_order_ids(&mut self, order_ids: Vec<i64>) {
        self.order_ids = order_ids;
    }

    pub fn set_fuel_usage(&mut self, fuel_usage: impl Into<FuelUsage>) {
        self.fuel_usage = fuel_usage.into();
    }

    pub fn set_options(&mut self, options: RouteOptions) {
        self.options = options;
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.teardown.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn build_request(&self) -> Result<RouteRequest, RouteError> {
        let mut builder = RouteRequestBuilder::default();
        builder
            .set_order_ids(self.order_ids.clone())
            .set_start(self.start)
            .set_end(self.end)
            .set_fuel_usage(self.fuel_usage.clone())
            .set_options(self.options);

        builder.build()
    }

    /// Sends the route request and emits the resulting markers.
    ///
    /// Fails with [`RouteError::SubmissionInProgress`] while another submission is pending and
    /// with [`RouteError::EmptySelection`] before any request is made when no order is selected.
    pub async fn submit(
        &self,
        emitter: &mut impl MarkerEmitter,
    ) -> Result<SubmitOutcome, RouteError> {
        if self.teardown.is_torn_down() {
            return Ok(SubmitOutcome::Discarded);
        }

        let _guard =
            InFlightGuard::acquire(&self.in_flight).ok_or(RouteError::SubmissionInProgress)?;

        let request = self.build_request()?;
        debug!("Submitting route request for {} orders", request.order_ids.len());

        let response = self.service.request_route(&request).await;

        if self.teardown.is_torn_down() {
            warn!("Route form was torn down during the request, discarding the response");
            return Ok(SubmitOutcome::Discarded);
        }

        let display = interpret_response(&response?)?;
        emit_markers(&display.markers, emitter);

        Ok(SubmitOutcome::Rendered(display))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        markers::{Marker, MarkerRole},
        test_utils::{FakeRouteService, route_response_fixture},
    };

    fn form_with(service: FakeRouteService) -> RouteForm<FakeRouteService> {
        let mut form = RouteForm::new(service);
        form.set_order_ids(vec![14, 15]);
        form.set_fuel_usage("7");
        form
    }

    #[tokio::test]
    async fn test_submit_emits_markers_in_order() {
        let form = form_with(FakeRouteService::responding(route_response_fixture()));
        let mut markers: Vec<Marker> = Vec::new();

        let outcome = form.submit(&mut markers).await.unwrap();

        let SubmitOutcome::Rendered(display) = outcome else {
            panic!("expected a rendered route");
        };
        assert_eq!(markers, display.markers);
        assert_eq!(markers.len(), 6);
        assert_eq!(markers[4].role, MarkerRole::Start);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_empty_selection_skips_the_request() {
        let service = FakeRouteService::responding(route_response_fixture());
        let form = RouteForm::new(service);
        let mut markers: Vec<Marker> = Vec::new();

        let result = form.submit(&mut markers).await;

        assert!(matches!(result, Err(RouteError::EmptySelection)));
        assert_eq!(form.service.calls.load(Ordering::SeqCst), 0);
        assert!(markers.is_empty());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_transport_and_malformed_errors_emit_nothing() {
        let form = form_with(FakeRouteService::failing(RouteError::TransportError(
            String::from("connection refused"),
        )));
        let mut markers: Vec<Marker> = Vec::new();

        let result = form.submit(&mut markers).await;
        assert!(matches!(result, Err(RouteError::TransportError(_))));
        assert!(markers.is_empty());

        let form = form_with(FakeRouteService::responding(json!({ "error": "quota" })));
        let result = form.submit(&mut markers).await;
        assert!(matches!(result, Err(RouteError::MalformedResponse(_))));
        assert!(markers.is_empty());
    }

    #[tokio::test]
    async fn test_second_submission_is_rejected_while_in_flight() {
        let release = Arc::new(Notify::new());
        let form = form_with(FakeRouteService::gated(
            route_response_fixture(),
            release.clone(),
        ));
        let mut first: Vec<Marker> = Vec::new();
        let mut second: Vec<Marker> = Vec::new();

        let (first_result, second_result) = tokio::join!(form.submit(&mut first), async {
            let result = form.submit(&mut second).await;
            release.notify_one();
            result
        });

        assert!(matches!(first_result, Ok(SubmitOutcome::Rendered(_))));
        assert!(matches!(
            second_result,
            Err(RouteError::SubmissionInProgress)
        ));
        assert_eq!(first.len(), 6);
        assert!(second.is_empty());
        assert_eq!(form.service.calls.load(Ordering::SeqCst), 1);

        // the gate is released once the first submission settles
        let mut third: Vec<Marker> = Vec::new();
        release.notify_one();
        assert!(matches!(
            form.submit(&mut third).await,
            Ok(SubmitOutcome::Rendered(_))
        ));
    }

    #[tokio::test]
    async fn test_teardown_discards_pending_markers() {
        let release = Arc::new(Notify::new());
        let form = form_with(FakeRouteService::gated(
            route_response_fixture(),
            release.clone(),
        ));
        let handle = form.teardown_handle();
        let mut markers: Vec<Marker> = Vec::new();

        let (outcome, _) = tokio::join!(form.submit(&mut markers), async {
            handle.teardown();
            release.notify_one();
        });

        assert!(matches!(outcome, Ok(SubmitOutcome::Discarded)));
        assert!(markers.is_empty());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_start_and_end_are_independent() {
        let mut form = RouteForm::new(FakeRouteService::responding(json!({})));

        form.select_start(Some(&json!({ "orderId": 3 })));
        form.select_end(Some(&json!({ "type": "position", "lat": 61.5, "lon": 23.8 })));
        assert_eq!(form.start(), Endpoint::OrderReference { order_id: 3 });

        form.select_start(None);
        assert_eq!(form.start(), Endpoint::Unset);
        assert_eq!(
            form.end(),
            Endpoint::Position {
                lat: 61.5,
                lon: 23.8
            }
        );
    }
}
