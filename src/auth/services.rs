use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        password::{hash_password, verify_password, PASSWORD_MIN_LENGTH},
        repo::{TokenStore, UserStore},
        repo_types::User,
        token::{generate_token, hash_token, TOKEN_TTL},
    },
    error::AppError,
};

pub const EMAIL_MAX_LENGTH: usize = 320;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trims and lowercases an email, rejecting malformed or overlong input.
pub(crate) fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.len() > EMAIL_MAX_LENGTH {
        return Err(AppError::validation("email", "Email is too long"));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("email", "Invalid email"));
    }
    Ok(email)
}

/// Raw token handed to the client exactly once.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: IssuedToken,
}

/// Issues, verifies and revokes bearer tokens on top of the user and token stores.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { users, tokens }
    }

    #[instrument(skip(self, email, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let email = normalize_email(email)?;
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(AppError::validation(
                "password",
                format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            warn!("registration for an email that is already taken");
            return Err(AppError::DuplicateEmail);
        }

        let hash = hash_password(password)?;
        let Some(user) = self.users.create(&email, &hash).await? else {
            warn!("email registered concurrently");
            return Err(AppError::DuplicateEmail);
        };

        let token = self.issue_token(user.id).await?;
        info!(user_id = %user.id, "user registered");
        Ok(AuthSession { user, token })
    }

    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(AppError::validation("password", "Password is required"));
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login for unknown email");
            return Err(AppError::InvalidCredentials);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            warn!(user_id = %user.id, "login for account without password");
            return Err(AppError::InvalidCredentials);
        };
        match verify_password(password, hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = %user.id, "login invalid password");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                error!(user_id = %user.id, error = %e, "stored password hash is unreadable");
                return Err(AppError::InvalidCredentials);
            }
        }

        let token = self.issue_token(user.id).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(AuthSession { user, token })
    }

    /// Resolves a raw token to its owner. Unknown, revoked and expired tokens
    /// all yield `Ok(None)`.
    #[instrument(skip_all)]
    pub async fn verify(&self, raw_token: &str) -> Result<Option<User>, AppError> {
        if raw_token.is_empty() {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let Some(active) = self.tokens.find_active(&hash_token(raw_token), now).await? else {
            debug!("token not found, revoked or expired");
            return Ok(None);
        };

        if let Err(e) = self.tokens.touch(active.token_id, now).await {
            warn!(error = %e, token_id = active.token_id, "failed to record token use");
        }
        Ok(Some(active.user))
    }

    /// Revokes the presented token if any. Always succeeds.
    #[instrument(skip_all)]
    pub async fn logout(&self, raw_token: Option<&str>) {
        let Some(raw_token) = raw_token.filter(|t| !t.is_empty()) else {
            return;
        };
        match self
            .tokens
            .revoke(&hash_token(raw_token), OffsetDateTime::now_utc())
            .await
        {
            Ok(0) => debug!("logout with unknown or already revoked token"),
            Ok(_) => info!("token revoked"),
            Err(e) => warn!(error = %e, "failed to revoke token"),
        }
    }

    async fn issue_token(&self, user_id: Uuid) -> anyhow::Result<IssuedToken> {
        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + TOKEN_TTL;
        self.tokens
            .insert(user_id, &hash_token(&token), expires_at)
            .await?;
        debug!(user_id = %user_id, "token issued");
        Ok(IssuedToken {
            token,
            ttl: TOKEN_TTL,
        })
    }
}
