// Credential plumbing and the credential-issuing endpoints.
//
// The client never stores a token itself: it asks a `BearerSource` on
// every request, so a credential cleared elsewhere stops being sent
// immediately.

use secrecy::SecretString;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AuthResponse, LoginRequest, Role, SignupRequest};

/// Supplies the bearer credential attached to authenticated requests.
pub trait BearerSource: Send + Sync {
    /// The current credential, or `None` when no session is held.
    fn bearer(&self) -> Option<SecretString>;
}

/// Never supplies a credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBearer;

impl BearerSource for NoBearer {
    fn bearer(&self) -> Option<SecretString> {
        None
    }
}

/// A fixed credential, for one-shot tools and tests.
#[derive(Debug, Clone)]
pub struct StaticBearer(pub SecretString);

impl BearerSource for StaticBearer {
    fn bearer(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// `POST /auth/{role}/login`
    pub async fn login(&self, role: Role, request: &LoginRequest) -> Result<AuthResponse, Error> {
        let url = self.url(&["auth", role.path_segment(), "login"])?;
        debug!(%role, "logging in");
        let resp = self.post_unauthenticated(url, request).await?;
        parse_auth(resp).await
    }

    /// Register a new account for `role`.
    ///
    /// `POST /auth/{role}/signup`
    pub async fn signup(
        &self,
        role: Role,
        request: &SignupRequest,
    ) -> Result<AuthResponse, Error> {
        let url = self.url(&["auth", role.path_segment(), "signup"])?;
        debug!(%role, "signing up");
        let resp = self.post_unauthenticated(url, request).await?;
        parse_auth(resp).await
    }
}

async fn parse_auth(resp: reqwest::Response) -> Result<AuthResponse, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    let parsed = serde_json::from_str::<AuthResponse>(&body);

    match parsed {
        Ok(auth) if status.is_success() && auth.success => Ok(auth),
        Ok(auth) => Err(Error::Rejected {
            status: status.as_u16(),
            message: auth.error.or(auth.message),
        }),
        Err(_) if !status.is_success() => Err(Error::Rejected {
            status: status.as_u16(),
            message: None,
        }),
        Err(e) => Err(Error::Deserialization {
            message: e.to_string(),
            body,
        }),
    }
}
