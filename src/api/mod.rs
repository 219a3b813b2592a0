//! Catalog Search: turns a query string into candidate display names.

pub mod models;
pub mod offline;
pub mod spotify;

pub use offline::OfflineCatalog;
pub use spotify::SpotifyClient;

use crate::config::{FlowConfig, SpotifyCredentials};
use crate::flow::Candidate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("no access token")]
    MissingToken,
}

/// A source of candidates. Implementations report failures; the flow
/// controller decides to swallow them.
#[allow(async_fn_in_trait)]
pub trait CatalogSearch {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, CatalogError>;
}

/// The catalog chosen at startup.
#[derive(Debug, Clone)]
pub enum CatalogBackend {
    Spotify(SpotifyClient),
    Offline(OfflineCatalog),
    /// Token acquisition failed; every search is empty and does no I/O.
    Unavailable,
}

impl CatalogBackend {
    /// Picks the backend for this session: Spotify when credentials are set
    /// and a token can be acquired, the built-in list when no credentials are
    /// set, and `Unavailable` when the handshake fails.
    pub async fn connect(credentials: Option<SpotifyCredentials>, config: &FlowConfig) -> Self {
        let Some(credentials) = credentials else {
            return Self::Offline(OfflineCatalog::default());
        };

        match SpotifyClient::connect(credentials, config.search_limit).await {
            Ok(client) => Self::Spotify(client),
            Err(e) => {
                tracing::warn!("Failed to get Spotify access token: {e}");
                Self::Unavailable
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Spotify(_) => "Spotify",
            Self::Offline(_) => "Built-in songs",
            Self::Unavailable => "Search unavailable",
        }
    }
}

impl CatalogSearch for CatalogBackend {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, CatalogError> {
        match self {
            Self::Spotify(client) => client.search(query).await,
            Self::Offline(catalog) => catalog.search(query).await,
            Self::Unavailable => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_fall_back_to_offline() {
        let backend = CatalogBackend::connect(None, &FlowConfig::default()).await;
        assert!(matches!(backend, CatalogBackend::Offline(_)));
        assert!(!backend.search("queen").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_is_always_empty() {
        let backend = CatalogBackend::Unavailable;
        assert!(backend.search("anything").await.unwrap().is_empty());
        assert_eq!(backend.label(), "Search unavailable");
    }
}
