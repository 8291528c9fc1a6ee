pub mod dto;

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// The verified caller. `user_id` is Google's stable `sub` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<Identity, AppError>;
}

/// Verifies Google ID tokens against the `tokeninfo` endpoint, one call per
/// request.
pub struct GoogleTokenVerifier {
    client: Client,
    tokeninfo_url: String,
    audience: Option<String>,
}

impl GoogleTokenVerifier {
    pub fn new(tokeninfo_url: String, audience: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            tokeninfo_url,
            audience,
        })
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<Identity, AppError> {
        let url = tokeninfo_request_url(&self.tokeninfo_url, id_token)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("tokeninfo request failed: {}", e)))?;

        if response.status().is_client_error() {
            return Err(AppError::Unauthorized(format!(
                "token rejected by Google ({})",
                response.status()
            )));
        }
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "tokeninfo returned {}",
                response.status()
            )));
        }

        let info: dto::TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse tokeninfo response: {}", e)))?;

        let identity = info.into_identity(self.audience.as_deref())?;
        debug!("verified google identity {}", identity.user_id);
        Ok(identity)
    }
}

fn tokeninfo_request_url(base: &str, id_token: &str) -> Result<Url, AppError> {
    Url::parse_with_params(base, &[("id_token", id_token)])
        .map_err(|e| AppError::Config(format!("GOOGLE_TOKENINFO_URL is invalid: {}", e)))
}

/// Fixed token table, for tests and local development without Google.
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, user_id: &str, email: Option<&str>) -> Self {
        self.tokens.insert(
            token.to_string(),
            Identity {
                user_id: user_id.to_string(),
                email: email.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<Identity, AppError> {
        self.tokens
            .get(id_token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("unknown token".to_string()))
    }
}

/// Extracts the bearer token and resolves it through `AppState::verifier`.
/// Missing or invalid identity is always a 401, never an empty result.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let header =
        header.ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("expected a Bearer token".to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?.to_string();

        let identity = state.verifier.verify(&token).await?;
        Ok(AuthUser(identity))
    }
}
