//! Credential checks and token issuance.

use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::repositories::UserRepository;
use crate::utils::jwt::{TokenPair, generate_token_pair, validate_refresh_token};
use crate::utils::password::verify_password;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Checks `email`/`password` and issues a token pair.
    ///
    /// Unknown emails and wrong passwords fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, TokenPair)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: INVALID_CREDENTIALS.to_string(),
            })?;

        if !verify_password(password, &user.password)? {
            tracing::info!(user_id = %user.id, "Rejected login with wrong password");
            return Err(AppError::Unauthorized {
                message: INVALID_CREDENTIALS.to_string(),
            });
        }

        let tokens = self.issue_tokens(&user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok((user, tokens))
    }

    /// Exchanges a refresh token for a new pair, re-reading the user so
    /// deleted accounts cannot refresh.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = validate_refresh_token(refresh_token, &self.jwt.secret)?;
        let user = self.live_user(claims.sub).await?;
        self.issue_tokens(&user)
    }

    /// Loads the account behind an authenticated request.
    pub async fn current_user(&self, user_id: Uuid) -> AppResult<User> {
        self.live_user(user_id).await
    }

    fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        generate_token_pair(
            user.id,
            &user.email,
            user.role,
            &self.jwt.secret,
            self.jwt.access_token_expiration,
            self.jwt.refresh_token_expiration,
        )
    }

    async fn live_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "User no longer exists".to_string(),
            })
    }
}
