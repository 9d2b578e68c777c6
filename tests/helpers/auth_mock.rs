//! Mock auth provider for testing
//!
//! A wiremock server answering the provider's password grant, signup and
//! logout endpoints.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use event_buddy::services::auth::Claims;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_API_KEY: &str = "test-anon-key";

/// Signed access token for `user_id`, valid for an hour
pub fn access_token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        email: Some(format!("{}@example.com", user_id.simple())),
        role: Some("authenticated".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to sign test token")
}

pub struct AuthProviderMock {
    pub server: MockServer,
}

impl AuthProviderMock {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to put in `AuthConfig::provider_url`
    pub fn provider_url(&self) -> String {
        format!("{}/auth/v1", self.server.uri())
    }

    fn session_body(user_id: Uuid, email: &str) -> Value {
        json!({
            "access_token": access_token_for(user_id),
            "refresh_token": "refresh-token",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": user_id, "email": email }
        })
    }

    pub async fn mock_sign_in_success(&self, user_id: Uuid, email: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::session_body(user_id, email)))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_sign_in_error(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Signup that needs email confirmation: the provider returns a bare user
    pub async fn mock_sign_up_pending(&self, user_id: Uuid, email: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": user_id,
                "email": email,
                "confirmation_sent_at": Utc::now().to_rfc3339()
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_sign_up_confirmed(&self, user_id: Uuid, email: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::session_body(user_id, email)))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_sign_up_error(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_logout(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
