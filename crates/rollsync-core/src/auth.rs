// ── Credential acquisition ──
//
// Thin service over the auth endpoints. A successful login writes the
// credential through the session gate, which is what wakes the
// synchronizer; nothing here touches the dataset directly.

use secrecy::SecretString;
use tracing::{info, warn};

use rollsync_api::{ApiClient, LoginRequest, Role, SignupRequest, UserProfile};

use crate::error::CoreError;
use crate::session::SessionGate;
use crate::store::keys;

const LOGIN_FAILED: &str = "Invalid credentials";
const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
const ALREADY_REGISTERED: &str = "This email or identifier is already registered. \
                                  Use a different one or log in instead.";

/// New primary-role account details.
#[derive(Debug, Clone)]
pub struct Registration {
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    api: ApiClient,
    gate: SessionGate,
}

impl Authenticator {
    pub fn new(api: ApiClient, gate: SessionGate) -> Self {
        Self { api, gate }
    }

    /// Sign in as a record keeper (fleet manager).
    pub async fn login_primary(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Option<UserProfile>, CoreError> {
        self.login(Role::Primary, None, email, password).await
    }

    /// Sign in as an enrolled person (driver), who also gives their
    /// identifier.
    pub async fn login_secondary(
        &self,
        identifier: &str,
        email: &str,
        password: SecretString,
    ) -> Result<Option<UserProfile>, CoreError> {
        self.login(Role::Secondary, Some(identifier.to_owned()), email, password)
            .await
    }

    async fn login(
        &self,
        role: Role,
        identifier: Option<String>,
        email: &str,
        password: SecretString,
    ) -> Result<Option<UserProfile>, CoreError> {
        let request = LoginRequest {
            identifier,
            email: email.to_owned(),
            password,
        };
        let resp = self.api.login(role, &request).await.map_err(|e| {
            warn!(%role, error = %e, "login failed");
            CoreError::AuthenticationFailed {
                message: e.service_message().unwrap_or(LOGIN_FAILED).to_owned(),
            }
        })?;

        let Some(token) = resp.token.filter(|t| !t.is_empty()) else {
            return Err(CoreError::AuthenticationFailed {
                message: "The service accepted the login but issued no credential".into(),
            });
        };
        self.gate
            .establish(&SecretString::from(token), resp.user.as_ref())?;
        info!(%role, "logged in");
        Ok(resp.user)
    }

    /// Register a primary-role account. Does not sign in.
    pub async fn signup_primary(&self, registration: Registration) -> Result<(), CoreError> {
        let request = SignupRequest {
            identifier: registration.identifier,
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            phone: registration.phone,
            department: registration.department,
            password: registration.password,
        };
        match self.api.signup(Role::Primary, &request).await {
            Ok(_) => {
                info!("signup accepted");
                Ok(())
            }
            Err(e) if e.status() == Some(409) => Err(CoreError::Conflict {
                message: ALREADY_REGISTERED.into(),
            }),
            Err(e) => Err(CoreError::Rejected {
                status: e.status(),
                message: e.service_message().unwrap_or(SIGNUP_FAILED).to_owned(),
            }),
        }
    }

    /// Forget the credential, the profile, and any per-role session
    /// markers.
    pub fn logout(&self) -> Result<(), CoreError> {
        let store = self.gate.store();
        store.remove(keys::CURRENT_PRIMARY)?;
        store.remove(keys::CURRENT_SECONDARY)?;
        self.gate.clear()?;
        Ok(())
    }

    pub fn session(&self) -> &SessionGate {
        &self.gate
    }
}
