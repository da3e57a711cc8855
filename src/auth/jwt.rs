use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::claims::{Claims, TokenKind, TokenPayload},
    config::JwtConfig,
    state::AppState,
};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("expected a {0:?} token")]
    WrongKind(TokenKind),
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// A signed token together with the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[derive(Clone)]
struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKey {
    fn from_secret(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes.max(1) as u64) * 60),
        }
    }
}

/// Access and refresh tokens are signed with independent secrets and lifetimes.
#[derive(Clone)]
pub struct JwtKeys {
    access: SigningKey,
    refresh: SigningKey,
    pub issuer: String,
    pub audience: String,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            access: SigningKey::from_secret(&cfg.access_secret, cfg.access_ttl_minutes),
            refresh: SigningKey::from_secret(&cfg.refresh_secret, cfg.refresh_ttl_minutes),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }

    fn key(&self, kind: TokenKind) -> &SigningKey {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Signs a token as if issued at `issued_at`.
    pub fn sign_at(
        &self,
        payload: &TokenPayload,
        kind: TokenKind,
        issued_at: OffsetDateTime,
    ) -> Result<IssuedToken, TokenError> {
        let key = self.key(kind);
        let expires_at = issued_at + TimeDuration::seconds(key.ttl.as_secs() as i64);
        let claims = Claims {
            sub: payload.user_id,
            email: match kind {
                TokenKind::Access => Some(payload.email.clone()),
                TokenKind::Refresh => None,
            },
            jti: Uuid::new_v4(),
            iat: issued_at.unix_timestamp().max(0) as usize,
            exp: expires_at.unix_timestamp().max(0) as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key.encoding)?;
        debug!(user_id = %payload.user_id, kind = ?kind, "jwt signed");
        Ok(IssuedToken { token, expires_at })
    }

    pub fn sign_access(&self, payload: &TokenPayload) -> Result<IssuedToken, TokenError> {
        self.sign_at(payload, TokenKind::Access, OffsetDateTime::now_utc())
    }

    pub fn sign_refresh(&self, payload: &TokenPayload) -> Result<IssuedToken, TokenError> {
        self.sign_at(payload, TokenKind::Refresh, OffsetDateTime::now_utc())
    }

    pub fn sign_pair(&self, payload: &TokenPayload) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.sign_access(payload)?,
            refresh: self.sign_refresh(payload)?,
        })
    }

    fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.key(kind).decoding, &validation).map_err(
            |e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;
        if data.claims.kind != kind {
            return Err(TokenError::WrongKind(kind));
        }
        debug!(user_id = %data.claims.sub, kind = ?kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_kind(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_kind(token, TokenKind::Refresh)
    }
}
