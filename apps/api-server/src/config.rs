//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use quill_core::AuthorPolicy;
use quill_infra::JwtConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Mount point of the posts API.
    pub base_path: String,
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    pub authors: AuthorPolicy,
}

/// Where posts are kept.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Firebase {
        database_url: String,
        auth: Option<String>,
        timeout: Duration,
    },
    InMemory,
}

/// How ID tokens are verified.
#[derive(Debug, Clone)]
pub enum IdentityConfig {
    Firebase { project_id: String, timeout: Duration },
    SharedSecret(JwtConfig),
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let timeout = Duration::from_secs(
            env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        );

        let store = match env::var("FIREBASE_DATABASE_URL") {
            Ok(database_url) if !database_url.is_empty() => StoreConfig::Firebase {
                database_url,
                auth: env::var("FIREBASE_DATABASE_AUTH").ok().filter(|s| !s.is_empty()),
                timeout,
            },
            _ => StoreConfig::InMemory,
        };

        let identity = match env::var("FIREBASE_PROJECT_ID") {
            Ok(project_id) if !project_id.is_empty() => IdentityConfig::Firebase {
                project_id,
                timeout,
            },
            _ => {
                let defaults = JwtConfig::default();
                IdentityConfig::SharedSecret(JwtConfig {
                    secret: env::var("ID_TOKEN_SECRET").unwrap_or(defaults.secret),
                    issuer: env::var("ID_TOKEN_ISSUER").unwrap_or(defaults.issuer),
                    expiration_hours: defaults.expiration_hours,
                })
            }
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_path: normalize_base_path(
                &env::var("POSTS_BASE_PATH").unwrap_or_else(|_| "/posts".to_string()),
            ),
            store,
            identity,
            authors: AuthorPolicy::from_list(
                &env::var("AUTHORIZED_AUTHOR_IDS").unwrap_or_default(),
            ),
        }
    }
}

/// Force a leading `/` and drop trailing ones, so `posts/` becomes `/posts`.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/posts"), "/posts");
        assert_eq!(normalize_base_path("posts/"), "/posts");
        assert_eq!(normalize_base_path("/api/posts/"), "/api/posts");
        assert_eq!(normalize_base_path(""), "/");
    }
}
