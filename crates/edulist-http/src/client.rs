//! HTTP client for the catalog API.

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace, warn};

use edulist_core::error::{MalformedResponseError, ProtocolError, TransportError};
use edulist_core::{ApiUrl, Error, Result};

use crate::endpoints::ErrorResponse;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: ApiUrl,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client for `base` with the default timeout.
    pub fn new(base: ApiUrl) -> Result<Self> {
        Self::with_timeout(base, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base: ApiUrl, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("edulist/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Http {
                message: format!("failed to build HTTP client: {}", err),
            })?;

        Ok(Self {
            client,
            base,
            timeout,
        })
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `path` with query `params` and decode the JSON body.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn get_json<Q, R>(&self, path: &str, params: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "GET");
        trace!(?params, "query parameters");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        self.handle_response(path, response).await
    }

    /// Decode a successful body, or turn an error status into a [`ProtocolError`].
    async fn handle_response<R: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "response");

        if !status.is_success() {
            let error = self.parse_error_response(response).await;
            return Err(Error::Protocol(error));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;

        serde_json::from_slice(&body).map_err(|err| {
            warn!(endpoint = path, error = %err, "malformed response body");
            MalformedResponseError::new(path, err).into()
        })
    }

    /// Parse an error body, keeping the server's message when there is one.
    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.into_message()),
            Err(_) => ProtocolError::new(status, None),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let transport = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        Error::Transport(transport)
    }
}
