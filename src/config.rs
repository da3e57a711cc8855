use anyhow::{bail, Context};
use serde::Deserialize;

/// Upper bound for both token lifetimes.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
    pub timeout_secs: u64,
}

/// Deployment flavour. Anything other than development gets secure cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub jwt: JwtConfig,
    pub youtube: YoutubeConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str, default: i64| -> anyhow::Result<i64> {
            match var(key) {
                Some(v) => v
                    .trim()
                    .parse::<i64>()
                    .with_context(|| format!("{key} must be an integer")),
                None => Ok(default),
            }
        };

        let database_url = var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let access_secret = var("ACCESS_TOKEN_SECRET")
            .or_else(|| var("JWT_SECRET"))
            .context("ACCESS_TOKEN_SECRET is not set")?;
        let refresh_secret = var("REFRESH_TOKEN_SECRET")
            .or_else(|| var("JWT_REFRESH_SECRET"))
            .context("REFRESH_TOKEN_SECRET is not set")?;
        if access_secret == refresh_secret {
            bail!("access and refresh token secrets must differ");
        }

        let access_ttl_minutes = parsed("ACCESS_TOKEN_TTL_MINUTES", 15)?;
        let refresh_ttl_minutes = parsed("REFRESH_TOKEN_TTL_MINUTES", 60 * 24 * 7)?;
        if access_ttl_minutes <= 0 || refresh_ttl_minutes <= 0 {
            bail!("token TTLs must be positive");
        }
        if access_ttl_minutes > MAX_TOKEN_TTL_MINUTES || refresh_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            bail!("token TTLs must not exceed {MAX_TOKEN_TTL_MINUTES} minutes (one year)");
        }

        let jwt = JwtConfig {
            access_secret,
            refresh_secret,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| "vidseek".into()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| "vidseek-users".into()),
            access_ttl_minutes,
            refresh_ttl_minutes,
        };

        let youtube = YoutubeConfig {
            base_url: var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| "https://youtube-v31.p.rapidapi.com".into()),
            api_key: var("X_RAPIDAPI_KEY"),
            api_host: var("X_RAPIDAPI_HOST"),
            timeout_secs: parsed("YOUTUBE_TIMEOUT_SECS", 10)?.max(1) as u64,
        };

        let port = var("APP_PORT")
            .or_else(|| var("PORT"))
            .map(|v| v.trim().parse::<u16>().context("APP_PORT must be a port number"))
            .transpose()?
            .unwrap_or(3000);

        Ok(Self {
            database_url,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 10)?.clamp(1, 100) as u32,
            environment: var("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(Environment::Development),
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            frontend_url: var("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".into()),
            jwt,
            youtube,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/vidseek"),
        ("ACCESS_TOKEN_SECRET", "access"),
        ("REFRESH_TOKEN_SECRET", "refresh"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let cfg = AppConfig::from_lookup(lookup(BASE)).expect("config");
        assert_eq!(cfg.jwt.access_ttl_minutes, 15);
        assert_eq!(cfg.jwt.refresh_ttl_minutes, 7 * 24 * 60);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.frontend_url, "http://localhost:5173");
        assert!(cfg.youtube.api_key.is_none());
    }

    #[test]
    fn legacy_secret_names_are_accepted() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/vidseek"),
            ("JWT_SECRET", "a"),
            ("JWT_REFRESH_SECRET", "b"),
            ("PORT", "8081"),
            ("APP_ENV", "production"),
        ]))
        .expect("config");
        assert_eq!(cfg.jwt.access_secret, "a");
        assert_eq!(cfg.jwt.refresh_secret, "b");
        assert_eq!(cfg.port, 8081);
        assert!(!cfg.environment.is_development());
    }

    #[test]
    fn identical_secrets_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/vidseek"),
            ("ACCESS_TOKEN_SECRET", "same"),
            ("REFRESH_TOKEN_SECRET", "same"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[rstest::rstest]
    #[case("ACCESS_TOKEN_TTL_MINUTES", "0")]
    #[case("REFRESH_TOKEN_TTL_MINUTES", "-1")]
    #[case("ACCESS_TOKEN_TTL_MINUTES", "525601")]
    #[case("REFRESH_TOKEN_TTL_MINUTES", "9223372036854775807")]
    fn out_of_range_ttls_are_rejected(#[case] key: &str, #[case] value: &str) {
        let mut pairs: Vec<(&str, &str)> = BASE.to_vec();
        pairs.push((key, value));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("TTL"), "{err}");
    }

    #[test]
    fn one_year_ttl_is_accepted() {
        let mut pairs: Vec<(&str, &str)> = BASE.to_vec();
        pairs.push(("REFRESH_TOKEN_TTL_MINUTES", "525600"));
        let cfg = AppConfig::from_lookup(lookup(&pairs)).expect("config");
        assert_eq!(cfg.jwt.refresh_ttl_minutes, MAX_TOKEN_TTL_MINUTES);
    }

    #[test]
    fn missing_database_url_fails() {
        let err = AppConfig::from_lookup(lookup(&[
            ("ACCESS_TOKEN_SECRET", "a"),
            ("REFRESH_TOKEN_SECRET", "b"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
