// Roster service HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, bearer injection and
// envelope unwrapping. Endpoint groups (people, subjects, events, auth) are
// implemented as inherent methods in sibling modules so this file stays
// focused on transport mechanics.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{BearerSource, NoBearer};
use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Path appended to the configured service address.
const API_PREFIX: &str = "/api";

/// Request/response client for the roster service.
///
/// Stateless apart from the connection pool: no retries, no caching, no
/// batching beyond what a single endpoint accepts. Every request reads the
/// current credential from the [`BearerSource`] at send time.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    bearer: Arc<dyn BearerSource>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the service root (e.g. `https://roster.example.com`);
    /// a trailing slash is trimmed and `/api` appended once.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        bearer: Arc<dyn BearerSource>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http, bearer)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        bearer: Arc<dyn BearerSource>,
    ) -> Result<Self, Error> {
        let root = base_url.trim_end_matches('/');
        let base_url = Url::parse(&format!("{root}{API_PREFIX}/"))?;
        Ok(Self {
            http,
            base_url,
            bearer,
        })
    }

    /// Client with no credential at all (auth endpoints, tests).
    pub fn anonymous(base_url: &str) -> Result<Self, Error> {
        Self::new(base_url, &TransportConfig::default(), Arc::new(NoBearer))
    }

    /// The resolved API root, including the `/api/` prefix.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/{segments...}`.
    ///
    /// Each segment is appended as one percent-encoded path component, so a
    /// record id can never climb out of its resource. Empty, `.` and `..`
    /// segments are refused before anything is sent.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidId {
                id: (*bad).to_owned(),
            });
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Attach the bearer credential, if one is held right now.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer.bearer() {
            Some(token) => req.header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => req,
        }
    }

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Envelope<T>, Error> {
        debug!("GET {}", url);
        let resp = self.authorize(self.http.get(url)).send().await?;
        parse_envelope(resp).await
    }

    /// Send a GET request with query parameters and unwrap the envelope.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &impl Serialize,
    ) -> Result<Envelope<T>, Error> {
        debug!("GET {}", url);
        let resp = self
            .authorize(self.http.get(url).query(query))
            .send()
            .await?;
        parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Envelope<T>, Error> {
        debug!("POST {}", url);
        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Envelope<T>, Error> {
        debug!("PUT {}", url);
        let resp = self.authorize(self.http.put(url).json(body)).send().await?;
        parse_envelope(resp).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<Envelope<T>, Error> {
        debug!("DELETE {}", url);
        let resp = self.authorize(self.http.delete(url)).send().await?;
        parse_envelope(resp).await
    }

    /// POST without the bearer header and return the raw response.
    /// Credential-issuing endpoints have their own envelope shape.
    pub(crate) async fn post_unauthenticated(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<reqwest::Response, Error> {
        debug!("POST {} (unauthenticated)", url);
        Ok(self.http.post(url).json(body).send().await?)
    }
}

/// Parse the `{ success, data, error }` envelope.
///
/// `401` short-circuits to [`Error::Unauthorized`]. Non-2xx statuses and
/// `success: false` both become [`Error::Rejected`] carrying the
/// service-provided message when the body has one.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Envelope<T>, Error> {
    let status = resp.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }

    let body = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|env| env.failure_message())
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_owned()));
        return Err(Error::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.clone(),
    })?;

    if envelope.success {
        Ok(envelope)
    } else {
        Err(Error::Rejected {
            status: status.as_u16(),
            message: envelope.failure_message(),
        })
    }
}
