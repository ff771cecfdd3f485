use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use chrono::{Duration, Utc};
use flightdesk_core::identity::TokenIssuer;
use flightdesk_core::{CoreError, CoreResult};
use flightdesk_shared::{AuthResponse, LoginRequest, RegisterRequest};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// JWT
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// HS256 tokens whose subject is the username.
pub struct JwtTokens {
    secret: String,
    expiration: u64,
}

impl JwtTokens {
    pub fn new(secret: String, expiration: u64) -> Self {
        Self { secret, expiration }
    }
}

impl TokenIssuer for JwtTokens {
    fn issue(&self, username: &str) -> CoreResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_owned(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::seconds(self.expiration as i64)).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| CoreError::InternalError(format!("Token encoding failed: {}", e)))
    }

    fn verify(&self, token: &str) -> CoreResult<String> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| CoreError::AuthenticationError(format!("Invalid token: {}", e)))?;

        Ok(data.claims.sub)
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
}

async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.auth.login(&request).await.map_err(AppError::auth)?;
    Ok(Json(response))
}

async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.auth.register(&request).await.map_err(AppError::auth)?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_verifies_to_username() {
        let tokens = JwtTokens::new("test-secret".to_string(), 60);
        let token = tokens.issue("alice").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = JwtTokens::new("one".to_string(), 60).issue("alice").unwrap();
        let other = JwtTokens::new("two".to_string(), 60);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"s")).unwrap();
        assert!(JwtTokens::new("s".to_string(), 60).verify(&token).is_err());
    }
}
