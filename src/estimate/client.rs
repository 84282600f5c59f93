//! HTTP implementation of [`EstimationService`] backed by `reqwest`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    DispatchEstimate, DispatchQuery, Endpoint, EstimationService, GenerationEstimate,
    ServiceError, SimulateQuery,
};

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("sunsave/", env!("CARGO_PKG_VERSION"));

/// Estimation service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEstimator {
    base_url: String,
    http: reqwest::Client,
}

impl HttpEstimator {
    /// Builds a client for the service rooted at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme, host and optional path prefix; a trailing `/` is ignored
    /// * `timeout` - Per-request timeout covering connect, send and body
    /// * `user_agent` - `User-Agent` header value
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Client` if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<Q, T>(&self, endpoint: Endpoint, query: &Q) -> Result<T, ServiceError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint.path());
        debug!(%url, "estimation request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ServiceError::Transport {
                endpoint,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| ServiceError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

impl EstimationService for HttpEstimator {
    async fn simulate(&self, query: &SimulateQuery) -> Result<GenerationEstimate, ServiceError> {
        self.get_json(Endpoint::Simulate, query).await
    }

    async fn dispatch(&self, query: &DispatchQuery) -> Result<DispatchEstimate, ServiceError> {
        self.get_json(Endpoint::Dispatch, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let c = HttpEstimator::new("http://localhost:5000/", Duration::from_secs(1), "t").unwrap();
        assert_eq!(c.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on loopback is not expected to be listening.
        let c = HttpEstimator::new("http://127.0.0.1:9", Duration::from_secs(2), "t").unwrap();
        let err = c
            .simulate(&SimulateQuery {
                postcode: "EC2A3AY".into(),
                kwp: 4.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Transport {
                endpoint: Endpoint::Simulate,
                ..
            }
        ));
    }
}
