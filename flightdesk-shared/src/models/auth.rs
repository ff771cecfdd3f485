use serde::{Deserialize, Serialize};

use crate::pii::Masked;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Masked<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub password: Masked<String>,
}

/// Answer of both login and register; `token` is null on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: bool,
    pub message: String,
    pub token: Option<String>,
}

impl AuthResponse {
    pub fn success(message: impl Into<String>, token: String) -> Self {
        Self {
            status: true,
            message: message.into(),
            token: Some(token),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            token: None,
        }
    }
}
