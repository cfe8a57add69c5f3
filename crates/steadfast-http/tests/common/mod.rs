//! Mock server helpers for client testing
//!
//! Simulates a flaky dependency: an endpoint that fails the first N-1 of
//! every N calls and succeeds on the Nth. The request counter lives on the
//! responder instance, so tests stay parallel-safe.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Once;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const CUSTOMER_PATH: &str = "/api/customers/1";
pub const ERROR_BODY: &str = r#"{"message":"Something went wrong"}"#;

/// Responds 500 to every request whose ordinal is not a multiple of
/// `period`, and 200 with a customer payload otherwise
pub struct FlakyResponder {
    hits: AtomicU32,
    period: u32,
}

impl FlakyResponder {
    pub fn new(period: u32) -> Self {
        Self {
            hits: AtomicU32::new(0),
            period,
        }
    }
}

impl Respond for FlakyResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let hit = self.hits.fetch_add(1, Ordering::SeqCst) + 1;

        if hit % self.period == 0 {
            ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "first_name": "Todd",
                "last_name": "Meinershagen",
            }))
        } else {
            ResponseTemplate::new(500).set_body_string(ERROR_BODY)
        }
    }
}

/// Mount a customer endpoint that succeeds on every `period`-th request
pub async fn mount_flaky_customer(server: &MockServer, period: u32) {
    Mock::given(method("GET"))
        .and(path(CUSTOMER_PATH))
        .respond_with(FlakyResponder::new(period))
        .mount(server)
        .await;
}

/// Mount a customer endpoint that always fails with 500
pub async fn mount_failing_customer(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CUSTOMER_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(ERROR_BODY))
        .mount(server)
        .await;
}

/// Mount a customer endpoint that answers 404
pub async fn mount_missing_customer(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CUSTOMER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"No such customer"}"#))
        .mount(server)
        .await;
}

pub fn customer_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), CUSTOMER_PATH)
}

/// Initialize tracing once for the whole test binary
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .init();
    });
}
