use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{PasswordHasher, TokenError, TokenService};
use crate::database::models::{NewUser, User};
use crate::database::{DatabaseError, UserStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Deliberately silent on whether the username or the password was wrong
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Sign-up, credential checks and token handling on top of a `UserStore`
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self { users, hasher, tokens }
    }

    pub async fn create_user(&self, name: &str, username: &str, password: &str) -> Result<User, AuthError> {
        let new_user = NewUser {
            name: name.to_string(),
            username: username.to_string(),
            password_hash: self.hasher.hash(username, password),
        };

        match self.users.create_user(new_user).await {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "user signed up");
                Ok(user)
            }
            Err(DatabaseError::UniqueViolation(_)) => {
                warn!(username, "sign-up rejected: username taken");
                Err(AuthError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<i32, AuthError> {
        let password_hash = self.hasher.hash(username, password);
        self.users
            .find_user_id(username, &password_hash)
            .await?
            .ok_or_else(|| {
                warn!(username, "sign-in rejected: invalid credentials");
                AuthError::InvalidCredentials
            })
    }

    /// Authenticates and issues a token for the resolved user
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user_id = self.authenticate(username, password).await?;
        let token = self.tokens.issue(user_id)?;
        info!(user_id, "user signed in");
        Ok(token)
    }

    pub fn parse_token(&self, token: &str) -> Result<i32, TokenError> {
        self.tokens.validate(token)
    }
}
