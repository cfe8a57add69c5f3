//! Reliable HTTP client
//!
//! `ReliableClient` wraps a `reqwest::Client` and a retry policy: each GET is
//! driven through the `steadfast-core` executor, with non-success responses
//! and transport faults mapped into `HttpFailure`. The client adds no
//! idempotency guarantee; every attempt re-issues the request.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use steadfast_core::{
    AlwaysTransient, ExecutionError, RetryExecutorBuilder, RetryPolicy, TracingObserver,
    TransientClassifier,
};

use crate::config::ClientConfig;
use crate::failure::HttpFailure;

/// HTTP client with policy-driven retries
///
/// Immutable after construction; safe to share across concurrent requests.
pub struct ReliableClient {
    client: reqwest::Client,
    policy: RetryPolicy,
    classifier: Arc<dyn TransientClassifier<HttpFailure>>,
    jitter: bool,
    cancel: Option<CancellationToken>,
}

impl ReliableClient {
    /// Create a client with default configuration and policy
    ///
    /// The default classifier treats any failure as transient, matching the
    /// behavior of a caller that retries on every unsuccessful response.
    pub fn new() -> Result<Self, HttpFailure> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from explicit configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, HttpFailure> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            policy: RetryPolicy::default(),
            classifier: Arc::new(AlwaysTransient),
            jitter: true,
            cancel: None,
        })
    }

    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Substitute the transient-error classifier
    ///
    /// Use `StatusClassifier::default_http()` to stop retrying on definite
    /// client errors such as 404 and 400.
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: TransientClassifier<HttpFailure> + 'static,
    {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Enable or disable jitter on retry delays
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Attach a cancellation token checked between attempts
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// GET a JSON resource, retrying transient failures per the policy
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ExecutionError<HttpFailure>> {
        self.executor("http-get")
            .execute(|| self.fetch_json::<T>(url))
            .await
    }

    /// GET a plain-text resource, retrying transient failures per the policy
    pub async fn get_text(&self, url: &str) -> Result<String, ExecutionError<HttpFailure>> {
        self.executor("http-get-text")
            .execute(|| self.fetch_text(url))
            .await
    }

    fn executor(
        &self,
        operation: &str,
    ) -> steadfast_core::RetryExecutor<Arc<dyn TransientClassifier<HttpFailure>>, TracingObserver>
    {
        let builder = RetryExecutorBuilder::new()
            .with_policy(self.policy.clone())
            .with_jitter(self.jitter)
            .with_classifier(self.classifier.clone())
            .with_observer(TracingObserver::new(operation));

        match &self.cancel {
            Some(token) => builder.with_cancellation(token.clone()).build(),
            None => builder.build(),
        }
    }

    /// One attempt: GET, check status, decode
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpFailure> {
        let body = self.fetch_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, HttpFailure> {
        debug!(url = %url, "sending GET request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HttpFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
