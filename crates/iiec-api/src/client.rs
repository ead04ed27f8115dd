// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction, bearer-token
// injection, and error-body decoding. Endpoint groups (auth, resources,
// sections, orders) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the IIEC backend.
///
/// Stateless with respect to authentication: callers pass the bearer token
/// per request, so the session layer above decides what happens when a
/// request comes back 401.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:8080`). A path
    /// prefix is allowed and preserved (`https://host/api`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for flows that need raw responses).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a backend path: `{base}/{path}`.
    ///
    /// Trailing slashes in `path` are kept, since the backend routes
    /// `POST /projects/` and `GET /projects` differently.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{}", path.trim_start_matches('/'));
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.send(self.request(Method::GET, url), token).await?;
        parse_json(resp).await
    }

    /// Send a POST request with JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .send(self.request(Method::POST, url).json(body), token)
            .await?;
        parse_json(resp).await
    }

    /// Send a PUT request with JSON body and decode the JSON response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .send(self.request(Method::PUT, url).json(body), token)
            .await?;
        parse_json(resp).await
    }

    /// Send a DELETE request. The response body (a confirmation message or
    /// nothing at all) is discarded.
    pub(crate) async fn delete(&self, url: Url, token: Option<&SecretString>) -> Result<(), Error> {
        debug!("DELETE {}", url);
        self.send(self.request(Method::DELETE, url), token).await?;
        Ok(())
    }

    /// Start a request with the JSON content type every endpoint expects.
    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Attach the bearer token, send, and turn non-success statuses into errors.
    ///
    /// A 401 is reported as [`Error::Unauthorized`] so the session layer can
    /// fail fast; every other non-success status becomes [`Error::Api`]
    /// carrying the backend's `detail` message.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, Error> {
        let mut request = request;
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_detail(&body)
                    .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
            });
        }

        Ok(resp)
    }
}

/// Decode a JSON response body, keeping the raw text on failure.
pub(crate) async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// Extract the backend's `detail` field from an error body.
///
/// FastAPI-style backends send either a string or a list of validation
/// entries; lists are rendered as compact JSON.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
