//! Per-service credentials read from the process environment.
//!
//! Every bundle fails fast when a required variable is missing or empty,
//! so invalid credentials never reach a network call.

use std::fmt;

/// Errors that can occur when loading credentials.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is unset.
    Missing { name: &'static str },
    /// A required environment variable is set but empty.
    Empty { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { name } => {
                write!(f, "missing environment variable {name} (export {name}='...')")
            }
            Self::Empty { name } => {
                write!(f, "environment variable {name} is empty (export {name}='...')")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Fetch one required variable through the injected lookup.
fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Err(ConfigError::Missing { name }),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty { name }),
        Some(v) => Ok(v),
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Base URL of the response engine service.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub base_url: String,
}

impl EngineSettings {
    pub const DEFAULT_URL: &'static str = "http://localhost:8000";

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("ENGINE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_URL.to_string());
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }
}

/// Reddit script-app credentials.
///
/// Create an app at https://www.reddit.com/prefs/apps (type "script").
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl RedditCredentials {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            client_id: required(&lookup, "REDDIT_CLIENT_ID")?,
            client_secret: required(&lookup, "REDDIT_CLIENT_SECRET")?,
            username: required(&lookup, "REDDIT_USERNAME")?,
            password: required(&lookup, "REDDIT_PASSWORD")?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }
}

/// Twitter app credentials.
///
/// Create an app at https://developer.twitter.com/.
#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub key: String,
    pub secret: String,
    pub token: String,
    pub token_secret: String,
}

impl TwitterCredentials {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            key: required(&lookup, "TWITTER_KEY")?,
            secret: required(&lookup, "TWITTER_SECRET")?,
            token: required(&lookup, "TWITTER_TOKEN")?,
            token_secret: required(&lookup, "TWITTER_TOKEN_SECRET")?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }
}

/// Gitter room + API token.
///
/// Obtain a token at https://developer.gitter.im/apps.
#[derive(Debug, Clone)]
pub struct GitterCredentials {
    /// Room URI, e.g. "jahrik/edward".
    pub room: String,
    pub api_token: String,
}

impl GitterCredentials {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            room: required(&lookup, "GITTER_ROOM")?,
            api_token: required(&lookup, "GITTER_API_TOKEN")?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }
}

/// HipChat server host, room, and access token.
#[derive(Debug, Clone)]
pub struct HipChatCredentials {
    /// Base URL of the HipChat server, e.g. "https://api.hipchat.com".
    pub host: String,
    pub room: String,
    pub access_token: String,
}

impl HipChatCredentials {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: required(&lookup, "HIPCHAT_HOST")?,
            room: required(&lookup, "HIPCHAT_ROOM")?,
            access_token: required(&lookup, "HIPCHAT_ACCESS_TOKEN")?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_reddit_full_bundle() {
        let lookup = lookup_from(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "secret"),
            ("REDDIT_USERNAME", "edward"),
            ("REDDIT_PASSWORD", "hunter2"),
        ]);
        let creds = RedditCredentials::from_lookup(lookup).expect("should load");
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.username, "edward");
    }

    #[test]
    fn test_missing_var_fails_fast() {
        let lookup = lookup_from(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "secret"),
            ("REDDIT_USERNAME", "edward"),
        ]);
        let err = RedditCredentials::from_lookup(lookup).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name: "REDDIT_PASSWORD" }));
        assert!(err.to_string().contains("export REDDIT_PASSWORD"));
    }

    #[test]
    fn test_empty_var_fails_fast() {
        let lookup = lookup_from(&[
            ("GITTER_ROOM", "jahrik/edward"),
            ("GITTER_API_TOKEN", "   "),
        ]);
        let err = GitterCredentials::from_lookup(lookup).unwrap_err();
        assert!(matches!(err, ConfigError::Empty { name: "GITTER_API_TOKEN" }));
    }

    #[test]
    fn test_twitter_requires_all_four() {
        let lookup = lookup_from(&[
            ("TWITTER_KEY", "k"),
            ("TWITTER_SECRET", "s"),
            ("TWITTER_TOKEN", "t"),
            ("TWITTER_TOKEN_SECRET", "ts"),
        ]);
        assert!(TwitterCredentials::from_lookup(lookup).is_ok());

        let partial = lookup_from(&[("TWITTER_KEY", "k")]);
        assert!(TwitterCredentials::from_lookup(partial).is_err());
    }

    #[test]
    fn test_hipchat_bundle() {
        let lookup = lookup_from(&[
            ("HIPCHAT_HOST", "https://api.hipchat.com"),
            ("HIPCHAT_ROOM", "lobby"),
            ("HIPCHAT_ACCESS_TOKEN", "tok"),
        ]);
        let creds = HipChatCredentials::from_lookup(lookup).expect("should load");
        assert_eq!(creds.room, "lobby");
    }

    #[test]
    fn test_engine_url_defaults() {
        let settings = EngineSettings::from_lookup(|_| None);
        assert_eq!(settings.base_url, EngineSettings::DEFAULT_URL);

        let settings = EngineSettings::from_lookup(lookup_from(&[("ENGINE_URL", "http://engine:9000")]));
        assert_eq!(settings.base_url, "http://engine:9000");
    }
}
