//! HTTP client for the telemetry API endpoints.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::{ProcessingState, UeState};

/// Errors from the telemetry REST layer.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout) or the
    /// response body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The telemetry API returned a non-2xx status code.
    #[error("telemetry API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// HTTP client for one telemetry API deployment.
///
/// Immutable after construction; the capture session is a parameter on
/// every call, never client state, so a single instance is safe to share
/// across concurrent requests.
pub struct TelemetryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    user_id: String,
}

impl TelemetryClient {
    /// Create a client for the API at `base_url`.
    ///
    /// `timeout` bounds every upstream call, connection setup included.
    pub fn new(
        base_url: &str,
        api_key: &str,
        user_id: &str,
        timeout: Duration,
    ) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            user_id: user_id.to_owned(),
        })
    }

    /// Fetch processing-time states for one baseband function of a
    /// session, over `[from, to]`.
    pub async fn processing_states(
        &self,
        session_id: &str,
        function: &str,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
    ) -> Result<Vec<ProcessingState>, TelemetryError> {
        let response = self
            .client
            .get(format!(
                "{}/api/sessions/{}/processing-states",
                self.base_url, session_id
            ))
            .header("X-Api-Key", &self.api_key)
            .header("X-User-Id", &self.user_id)
            .query(&[
                ("function", function.to_owned()),
                ("from", from.to_rfc3339()),
                ("to", to.to_rfc3339()),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch UE radio-link states for a session over `[from, to]`.
    ///
    /// `self_only` restricts the result to serving-side measurements
    /// instead of the remote UE's.
    pub async fn ue_states(
        &self,
        session_id: &str,
        ue: &str,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
        self_only: bool,
    ) -> Result<Vec<UeState>, TelemetryError> {
        let response = self
            .client
            .get(format!(
                "{}/api/sessions/{}/ue-states",
                self.base_url, session_id
            ))
            .header("X-Api-Key", &self.api_key)
            .header("X-User-Id", &self.user_id)
            .query(&[
                ("ue", ue.to_owned()),
                ("from", from.to_rfc3339()),
                ("to", to.to_rfc3339()),
                ("self", self_only.to_string()),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`TelemetryError::Api`] containing the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TelemetryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TelemetryError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TelemetryError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
