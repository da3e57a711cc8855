//! Register, login, refresh, logout and profile over the user and
//! refresh-token stores.

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::TokenPayload,
        dto::{LoginRequest, PublicUser, RegisterRequest},
        jwt::{TokenError, TokenPair},
        password::{hash_password, verify_password},
        repo_types::{NewUser, User},
    },
    error::{AppError, AppResult},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Result of a successful register or login.
#[derive(Debug)]
pub struct AuthSession {
    pub user: PublicUser,
    pub tokens: TokenPair,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid");
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

/// Username defaults to the email local-part.
fn username_for(email: &str, username: Option<String>) -> String {
    required(username)
        .map(|u| u.trim().to_owned())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_owned())
}

fn sign_error(e: TokenError) -> AppError {
    AppError::Internal(anyhow::anyhow!(e).context("sign token"))
}

/// Issues a fresh pair and persists the refresh half.
async fn issue_session(state: &AppState, user: &User) -> AppResult<TokenPair> {
    let payload = TokenPayload {
        user_id: user.id,
        email: user.email.clone(),
    };
    let tokens = state.keys.sign_pair(&payload).map_err(sign_error)?;
    state
        .refresh_tokens
        .insert(user.id, &tokens.refresh.token, tokens.refresh.expires_at)
        .await?;
    Ok(tokens)
}

pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<AuthSession> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(AppError::validation("Email and password are required"));
    };
    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::conflict("User with this email already exists"));
    }

    let password_hash = hash_password(&password)?;
    let new_user = NewUser {
        username: username_for(&email, req.username),
        email: email.clone(),
        password_hash,
    };
    // The insert is ON CONFLICT DO NOTHING, so a concurrent registration lands here.
    let Some(user) = state.users.create(new_user).await? else {
        warn!(email = %email, "email registered concurrently");
        return Err(AppError::conflict("User with this email already exists"));
    };

    let tokens = issue_session(state, &user).await?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthSession {
        user: user.into(),
        tokens,
    })
}

pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<AuthSession> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(AppError::validation("Email and password are required"));
    };
    let email = normalize_email(&email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let tokens = issue_session(state, &user).await?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthSession {
        user: user.into(),
        tokens,
    })
}

/// Exchanges a refresh token for a new pair. The presented token is revoked
/// (full rotation), so it cannot be replayed.
pub async fn refresh(state: &AppState, token: Option<&str>) -> AppResult<TokenPair> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Err(AppError::unauthorized("Refresh token required"));
    };

    let claims = match state.keys.verify_refresh(token) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            let removed = state.refresh_tokens.delete_by_token(token).await?;
            warn!(removed, "refresh token expired");
            return Err(AppError::RefreshTokenExpired);
        }
        Err(e) => {
            warn!(error = %e, "refresh token rejected");
            return Err(AppError::InvalidRefreshToken);
        }
    };

    let Some(stored) = state.refresh_tokens.find(token).await? else {
        warn!(user_id = %claims.sub, "refresh token not in store");
        return Err(AppError::InvalidRefreshToken);
    };

    if stored.is_expired_at(OffsetDateTime::now_utc()) {
        state.refresh_tokens.delete(stored.id).await?;
        warn!(user_id = %stored.user_id, "stored refresh token expired");
        return Err(AppError::RefreshTokenExpired);
    }

    if stored.user_id != claims.sub {
        warn!(user_id = %claims.sub, owner = %stored.user_id, "refresh token owner mismatch");
        return Err(AppError::InvalidRefreshToken);
    }

    let Some(user) = state.users.find_by_id(claims.sub).await? else {
        state.refresh_tokens.delete(stored.id).await?;
        return Err(AppError::unauthorized("User not found"));
    };

    state.refresh_tokens.delete(stored.id).await?;
    let tokens = issue_session(state, &user).await?;
    info!(user_id = %user.id, "refresh token rotated");
    Ok(tokens)
}

/// Revokes the presented refresh token, if any. Never fails: cookies are
/// cleared by the caller either way.
pub async fn logout(state: &AppState, token: Option<&str>) {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return;
    };
    match state.refresh_tokens.delete_by_token(token).await {
        Ok(removed) => info!(removed, "logged out"),
        Err(e) => error!(error = %e, "failed to revoke refresh token on logout"),
    }
}

pub async fn get_profile(state: &AppState, user_id: Uuid) -> AppResult<PublicUser> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| AppError::not_found("User not found"))
}
