use coop_lending::config::SimulationConfig;
use coop_lending::session::SessionStore;
use coop_lending::workflows::loans::{
    LoanPortalService, SimulatedGateway, TracingNavigator, TracingNotifier,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Portal wired with the simulated back office and tracing-backed notifications.
pub(crate) type PortalService =
    LoanPortalService<SimulatedGateway, TracingNotifier, TracingNavigator>;

pub(crate) fn build_portal(simulation: SimulationConfig) -> PortalService {
    LoanPortalService::new(
        Arc::new(SessionStore::new(simulation.login_delay)),
        Arc::new(SimulatedGateway::new(simulation.submission_delay)),
        Arc::new(TracingNotifier),
        Arc::new(TracingNavigator),
    )
}
