//! Liveness and readiness probes.
//!
//! ```text
//! GET /health/live   200 {"status":"ok"} | 503 {"status":"unavailable"}
//! GET /health/ready  200 {"status":"ok"} | 503 {"status":"unavailable"}
//! ```
//!
//! Probe responses are never cached.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Process-wide probe flags.
///
/// Starts live but not ready; the server marks itself ready once the
/// listener is bound and flips liveness off while draining.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Report the process as draining so liveness probes fail fast.
    pub fn mark_draining(&self) {
        self.ready.store(false, Ordering::Release);
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Ok,
    Unavailable,
}

/// Probe response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProbeResponse {
    pub status: ProbeStatus,
}

fn probe(healthy: bool) -> HttpResponse {
    let (mut builder, status) = if healthy {
        (HttpResponse::Ok(), ProbeStatus::Ok)
    } else {
        (HttpResponse::ServiceUnavailable(), ProbeStatus::Unavailable)
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ProbeResponse { status })
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Accepting traffic", body = ProbeResponse),
        (status = 503, description = "Not ready", body = ProbeResponse)
    ),
    tags = ["health"],
    operation_id = "ready",
    security([])
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Process alive", body = ProbeResponse),
        (status = 503, description = "Shutting down", body = ProbeResponse)
    ),
    tags = ["health"],
    operation_id = "live",
    security([])
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    #[derive(Debug, Clone, Copy)]
    enum Setup {
        Fresh,
        Ready,
        Draining,
    }

    fn state_for(setup: Setup) -> web::Data<HealthState> {
        let state = web::Data::new(HealthState::new());
        match setup {
            Setup::Fresh => {}
            Setup::Ready => state.mark_ready(),
            Setup::Draining => {
                state.mark_ready();
                state.mark_draining();
            }
        }
        state
    }

    #[rstest]
    #[case(Setup::Fresh, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Setup::Ready, "/health/ready", StatusCode::OK)]
    #[case(Setup::Draining, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Setup::Fresh, "/health/live", StatusCode::OK)]
    #[case(Setup::Draining, "/health/live", StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn probes_follow_state(
        #[case] setup: Setup,
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let app = actix_test::init_service(
            App::new()
                .app_data(state_for(setup))
                .service(ready)
                .service(live),
        )
        .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(response.status(), expected);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        let status = if expected == StatusCode::OK {
            "ok"
        } else {
            "unavailable"
        };
        assert_eq!(body.get("status").and_then(Value::as_str), Some(status));
    }

    #[rstest]
    #[actix_web::test]
    async fn probes_reject_other_methods() {
        let app = actix_test::init_service(
            App::new()
                .app_data(state_for(Setup::Ready))
                .service(ready),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/health/ready")
                .to_request(),
        )
        .await;
        assert!(response.status().is_client_error());
    }
}
