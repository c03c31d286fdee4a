//! Application configuration loaded from environment variables.

use std::env;

use yatube_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub run_migrations: bool,
    pub jwt: JwtConfig,
    pub site: SiteSettings,
}

/// Behaviour knobs the handlers read at request time.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub posts_per_page: u64,
    /// Users listed here get the `staff` role when they log in.
    pub staff_usernames: Vec<String>,
    pub cookie_secure: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            staff_usernames: Vec::new(),
            cookie_secure: false,
        }
    }
}

impl SiteSettings {
    pub const STAFF_ROLE: &'static str = "staff";

    /// Roles to put in a freshly issued session token.
    pub fn roles_for(&self, username: &str) -> Vec<String> {
        if self.staff_usernames.iter().any(|u| u == username) {
            vec![Self::STAFF_ROLE.to_string()]
        } else {
            Vec::new()
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let defaults = SiteSettings::default();
        let site = SiteSettings {
            posts_per_page: parse_var("POSTS_PER_PAGE").unwrap_or(defaults.posts_per_page),
            staff_usernames: env::var("STAFF_USERNAMES")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.cookie_secure),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            jwt: JwtConfig::from_env(),
            site,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off" | "")
}

/// Comma separated, blanks dropped.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
