use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

/// What `add_candidate` does with a song that is already in the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    Allow,
}

/// What `verify` does with an attempt whose length differs from the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthMismatchPolicy {
    /// Report the wrong count and keep the retry budget untouched.
    #[default]
    Reject,
    /// Treat it like a wrong-order attempt.
    CountAsFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    pub min_query_chars: usize,
    pub retry_budget: u32,
    pub login_gate: bool,
    pub duplicate_policy: DuplicatePolicy,
    pub length_mismatch_policy: LengthMismatchPolicy,
    pub search_limit: u32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            retry_budget: 2,
            login_gate: true,
            duplicate_policy: DuplicatePolicy::Reject,
            length_mismatch_policy: LengthMismatchPolicy::Reject,
            search_limit: 10,
        }
    }
}

impl FlowConfig {
    /// Defaults overridden by `SONGAUTH_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let allow_duplicates = try_load(&lookup, "SONGAUTH_ALLOW_DUPLICATES", false);
        let count_mismatch = try_load(&lookup, "SONGAUTH_COUNT_LENGTH_MISMATCH", false);

        Self {
            min_query_chars: try_load(
                &lookup,
                "SONGAUTH_MIN_QUERY_CHARS",
                defaults.min_query_chars,
            ),
            retry_budget: try_load(&lookup, "SONGAUTH_RETRY_BUDGET", defaults.retry_budget)
                .max(1),
            login_gate: try_load(&lookup, "SONGAUTH_LOGIN_GATE", defaults.login_gate),
            duplicate_policy: if allow_duplicates {
                DuplicatePolicy::Allow
            } else {
                DuplicatePolicy::Reject
            },
            length_mismatch_policy: if count_mismatch {
                LengthMismatchPolicy::CountAsFailure
            } else {
                LengthMismatchPolicy::Reject
            },
            search_limit: try_load(&lookup, "SONGAUTH_SEARCH_LIMIT", defaults.search_limit)
                .clamp(1, 50),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => {
            info!("{key} set to {value}");
            value
        }
        Err(e) => {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }
    }
}

/// Client-credentials pair for the Spotify Web API.
#[derive(Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl SpotifyCredentials {
    /// Runtime environment first, then whatever was baked in at compile time
    /// (the only option for wasm builds).
    pub fn load() -> Option<Self> {
        let client_id = env::var("SPOTIFY_CLIENT_ID")
            .ok()
            .or_else(|| option_env!("SPOTIFY_CLIENT_ID").map(str::to_string));
        let client_secret = env::var("SPOTIFY_CLIENT_SECRET")
            .ok()
            .or_else(|| option_env!("SPOTIFY_CLIENT_SECRET").map(str::to_string));

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Self::new(client_id, client_secret),
            _ => {
                warn!("Spotify credentials not set, falling back to the offline catalog");
                None
            }
        }
    }

    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Option<Self> {
        let client_id = client_id.into().trim().to_string();
        let client_secret = client_secret.into().trim().to_string();
        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }
        Some(Self {
            client_id,
            client_secret,
        })
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = FlowConfig::from_lookup(|_| None);
        assert_eq!(config, FlowConfig::default());
        assert_eq!(config.min_query_chars, 2);
        assert_eq!(config.retry_budget, 2);
        assert!(config.login_gate);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = FlowConfig::from_lookup(lookup_from(&[
            ("SONGAUTH_MIN_QUERY_CHARS", "3"),
            ("SONGAUTH_RETRY_BUDGET", " 5 "),
            ("SONGAUTH_LOGIN_GATE", "false"),
            ("SONGAUTH_ALLOW_DUPLICATES", "true"),
            ("SONGAUTH_COUNT_LENGTH_MISMATCH", "true"),
        ]));
        assert_eq!(config.min_query_chars, 3);
        assert_eq!(config.retry_budget, 5);
        assert!(!config.login_gate);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Allow);
        assert_eq!(
            config.length_mismatch_policy,
            LengthMismatchPolicy::CountAsFailure
        );
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = FlowConfig::from_lookup(lookup_from(&[
            ("SONGAUTH_RETRY_BUDGET", "lots"),
            ("SONGAUTH_LOGIN_GATE", "maybe"),
            ("SONGAUTH_SEARCH_LIMIT", "500"),
        ]));
        assert_eq!(config.retry_budget, 2);
        assert!(config.login_gate);
        assert_eq!(config.search_limit, 50);
    }

    #[test]
    fn retry_budget_allows_at_least_one_attempt() {
        let config = FlowConfig::from_lookup(lookup_from(&[("SONGAUTH_RETRY_BUDGET", "0")]));
        assert_eq!(config.retry_budget, 1);
    }

    #[test]
    fn blank_credentials_are_rejected() {
        assert!(SpotifyCredentials::new("id", "  ").is_none());
        assert!(SpotifyCredentials::new("", "secret").is_none());
        let creds = SpotifyCredentials::new(" id ", "secret").expect("valid credentials");
        assert_eq!(creds.client_id, "id");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"secret\""));
    }
}
