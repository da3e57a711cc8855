use crate::auth::cookies::CookieSettings;
use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{PgRefreshTokenStore, PgUserStore, RefreshTokenStore, UserStore};
use crate::config::AppConfig;
use crate::history::repo::{HistoryStore, PgHistoryStore};
use crate::youtube::YoutubeApi;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub cookies: CookieSettings,
    pub users: Arc<dyn UserStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub history: Arc<dyn HistoryStore>,
    pub youtube: Arc<dyn YoutubeApi>,
}

impl AppState {
    /// Wires the Postgres stores over one shared pool.
    pub fn from_parts(config: AppConfig, db: PgPool, youtube: Arc<dyn YoutubeApi>) -> Self {
        Self::with_stores(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgRefreshTokenStore::new(db.clone())),
            Arc::new(PgHistoryStore::new(db)),
            youtube,
        )
    }

    pub fn with_stores(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        history: Arc<dyn HistoryStore>,
        youtube: Arc<dyn YoutubeApi>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        let cookies = CookieSettings::from_config(&config);
        Self {
            config: Arc::new(config),
            keys,
            cookies,
            users,
            refresh_tokens,
            history,
            youtube,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        crate::test_support::fake_state().0
    }
}
