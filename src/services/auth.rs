//! Authentication service implementation
//!
//! Sign-in, sign-up and sign-out are delegated to the hosted auth provider
//! over HTTP. Access tokens it issues are verified locally with the shared
//! project secret.

use std::time::Duration;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::utils::errors::{AuthError, EventBuddyError, Result};
use crate::utils::logging::{log_api_error, log_auth_attempt};

/// Claims the provider puts in its access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpOutcome {
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Present when the provider confirms accounts automatically
    pub session: Option<AuthSession>,
    pub confirmation_required: bool,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    user: ProviderUser,
}

/// Signup answers with either a session or a bare user
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(ProviderUser),
}

/// The provider has used several error shapes over time
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ProviderErrorBody {
    fn into_message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .unwrap_or_default()
    }
}

impl From<TokenResponse> for AuthSession {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            user_id: response.user.id,
            email: response.user.email,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    client: Client,
    config: AuthConfig,
    decoding_key: DecodingKey,
    validation: Validation,
    retry_after: Regex,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("provider_url", &self.config.provider_url)
            .finish()
    }
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("EventBuddy/1.0")
            .build()?;

        let mut validation = Validation::new(Algorithm::HS256);
        match &config.jwt_audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }

        let retry_after = Regex::new(r"(?i)after (\d+) seconds?")
            .map_err(|e| EventBuddyError::Config(e.to_string()))?;

        Ok(Self {
            client,
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            config,
            retry_after,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.provider_url.trim_end_matches('/'), path)
    }

    /// Password sign-in
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession> {
        debug!("Signing in with password grant");

        let response = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.config.api_key)
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = self.provider_error(response).await;
            log_auth_attempt(&credentials.email, "sign_in", false);
            return Err(error.into());
        }

        let token: TokenResponse = response.json().await?;
        log_auth_attempt(&credentials.email, "sign_in", true);
        Ok(token.into())
    }

    /// Register a new account
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome> {
        if credentials.email.trim().is_empty() || !credentials.email.contains('@') {
            return Err(EventBuddyError::InvalidInput(
                "Please enter a valid email address.".to_string(),
            ));
        }

        let response = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.config.api_key)
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = self.provider_error(response).await;
            log_auth_attempt(&credentials.email, "sign_up", false);
            return Err(error.into());
        }

        let outcome = match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(token) => {
                let session = AuthSession::from(token);
                SignUpOutcome {
                    user_id: session.user_id,
                    email: session.email.clone(),
                    session: Some(session),
                    confirmation_required: false,
                }
            }
            SignUpResponse::User(user) => SignUpOutcome {
                user_id: user.id,
                email: user.email,
                session: None,
                confirmation_required: true,
            },
        };

        log_auth_attempt(&credentials.email, "sign_up", true);
        info!(user_id = %outcome.user_id, confirmation_required = outcome.confirmation_required, "Account created");
        Ok(outcome)
    }

    /// Revoke the session behind `access_token`
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.config.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await?;

        // An already revoked session counts as signed out
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }

        Err(self.provider_error(response).await.into())
    }

    /// Verify an access token and extract the caller
    pub fn verify_token(&self, token: &str) -> Result<AuthContext> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| EventBuddyError::Unauthorized)?;

        Ok(AuthContext {
            user_id,
            email: data.claims.email,
            access_token: token.to_string(),
        })
    }

    async fn provider_error(&self, response: reqwest::Response) -> AuthError {
        let status = response.status();
        let retry_header = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .map(ProviderErrorBody::into_message)
            .unwrap_or(body);

        log_api_error("auth_provider", &message, Some(status.as_str()));

        match self.map_provider_error(status.as_u16(), &message) {
            AuthError::RateLimited { retry_after_seconds: None } => AuthError::RateLimited {
                retry_after_seconds: retry_header,
            },
            other => other,
        }
    }

    /// Translate a provider failure into a form-level error
    pub fn map_provider_error(&self, status: u16, message: &str) -> AuthError {
        let lowered = message.to_lowercase();

        if status == 429 || lowered.contains("rate limit") || lowered.contains("only request this after") {
            let retry_after_seconds = self
                .retry_after
                .captures(message)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok());
            return AuthError::RateLimited { retry_after_seconds };
        }
        if lowered.contains("invalid login credentials") {
            return AuthError::InvalidCredentials;
        }
        if lowered.contains("email not confirmed") {
            return AuthError::EmailNotConfirmed;
        }
        if lowered.contains("already registered") || lowered.contains("already been registered") {
            return AuthError::UserAlreadyExists;
        }
        if lowered.contains("password should") || lowered.contains("weak password") {
            return AuthError::WeakPassword(message.to_string());
        }

        warn!(status = status, message = %message, "Unmapped auth provider error");
        if message.is_empty() {
            AuthError::Provider("Sign-in failed. Please try again.".to_string())
        } else {
            AuthError::Provider(message.to_string())
        }
    }
}
