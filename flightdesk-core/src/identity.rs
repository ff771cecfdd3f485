use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use flightdesk_shared::{AuthResponse, LoginRequest, RegisterRequest};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::{Customer, Role};
use crate::repository::CustomerRepository;
use crate::{CoreError, CoreResult};

/// Implementations must not block the async runtime.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> CoreResult<String>;

    async fn verify(&self, plain: &str, hash: &str) -> CoreResult<bool>;
}

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

// bcrypt runs on the blocking pool
#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, plain: &str) -> CoreResult<String> {
        let plain = plain.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .map_err(|e| CoreError::InternalError(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| CoreError::InternalError(format!("Password hashing failed: {}", e)))
    }

    async fn verify(&self, plain: &str, hash: &str) -> CoreResult<bool> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
            .await
            .map_err(|e| CoreError::InternalError(format!("Password verification task failed: {}", e)))?
            .map_err(|e| CoreError::InternalError(format!("Password verification failed: {}", e)))
    }
}

/// Issues and checks bearer tokens carrying a username.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, username: &str) -> CoreResult<String>;

    /// Returns the embedded username when the signature and expiry check out.
    fn verify(&self, token: &str) -> CoreResult<String>;
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.roles.contains(r))
    }
}

pub struct AuthService {
    customers: Arc<dyn CustomerRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self { customers, hasher, tokens }
    }

    pub async fn login(&self, request: &LoginRequest) -> CoreResult<AuthResponse> {
        let customer = self
            .customers
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| CoreError::AuthenticationError("No user registered with this details!".to_string()))?;

        if !self.hasher.verify(request.password.expose(), &customer.password_hash).await? {
            warn!("Rejected password for {}", customer.username);
            return Err(CoreError::AuthenticationError("Invalid password!".to_string()));
        }

        let token = self.tokens.issue(&customer.username)?;
        info!("User {} logged in", customer.username);

        Ok(AuthResponse::success("User login operation is successful", token))
    }

    /// A taken username or email surfaces as the storage unique violation.
    pub async fn register(&self, request: &RegisterRequest) -> CoreResult<AuthResponse> {
        let customer = Customer {
            id: Uuid::new_v4(),
            username: request.username.clone(),
            first_name: request.first_name.clone(),
            middle_name: request.middle_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            password_hash: self.hasher.hash(request.password.expose()).await?,
            roles: BTreeSet::from([Role::User]),
        };

        let saved = self.customers.create(&customer).await?;
        let token = self.tokens.issue(&saved.username)?;
        info!("Registered user {}", saved.username);

        Ok(AuthResponse::success(format!("Welcome {}!", saved.username), token))
    }

    /// Resolves a bearer token to the account's current roles.
    /// Any failure leaves the request unauthenticated.
    pub async fn authenticate(&self, token: &str) -> Option<Principal> {
        let username = match self.tokens.verify(token) {
            Ok(username) => username,
            Err(e) => {
                debug!("Bearer token rejected: {}", e);
                return None;
            }
        };

        match self.customers.find_by_username(&username).await {
            Ok(Some(customer)) => Some(Principal {
                username: customer.username,
                roles: customer.roles,
            }),
            Ok(None) => {
                debug!("Token subject {} has no account", username);
                None
            }
            Err(e) => {
                warn!("Account lookup failed during authentication: {}", e);
                None
            }
        }
    }

    /// Creates the admin account on first boot. Returns whether it was created.
    pub async fn ensure_admin(&self, username: &str, password: &str, email: &str) -> CoreResult<bool> {
        if self.customers.find_by_username(username).await?.is_some() {
            debug!("Admin account {} already present", username);
            return Ok(false);
        }

        let admin = Customer {
            id: Uuid::new_v4(),
            username: username.to_string(),
            first_name: "Admin".to_string(),
            middle_name: None,
            last_name: "Admin".to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password).await?,
            roles: BTreeSet::from([Role::Admin]),
        };
        self.customers.create(&admin).await?;
        info!("Seeded admin account {}", username);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bcrypt_round_trip() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("admin_pass123").await.unwrap();
        assert_ne!(hash, "admin_pass123");
        assert!(hasher.verify("admin_pass123", &hash).await.unwrap());
        assert!(!hasher.verify("wrong", &hash).await.unwrap());
    }

    #[test]
    fn test_principal_role_check() {
        let user = Principal {
            username: "alice".to_string(),
            roles: BTreeSet::from([Role::User]),
        };
        assert!(user.has_any_role(&[Role::User, Role::Admin]));
        assert!(!user.has_any_role(&[Role::Admin]));
    }
}
