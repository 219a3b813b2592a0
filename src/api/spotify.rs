// Spotify Web API: client-credentials token acquisition and track search.
use super::models::{ErrorResponse, SearchResponse, TokenResponse};
use super::{CatalogError, CatalogSearch};
use crate::config::SpotifyCredentials;
use crate::flow::Candidate;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use once_cell::sync::Lazy;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::collections::HashMap;
use std::sync::Mutex;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";
// Refresh a little before the server-side expiry.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[cfg(not(target_arch = "wasm32"))]
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});
#[cfg(target_arch = "wasm32")]
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

static TOKEN_CACHE: Lazy<Mutex<HashMap<String, AccessToken>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl AccessToken {
    fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Result<Self, CatalogError> {
        if let Some(kind) = response.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(CatalogError::Decode(format!("unexpected token type {kind}")));
            }
        }
        let value = response.access_token.trim().to_string();
        if value.is_empty() {
            return Err(CatalogError::MissingToken);
        }
        let lifetime = response.expires_in.unwrap_or(3600).max(0);
        Ok(Self {
            value,
            expires_at: now + ChronoDuration::seconds(lifetime),
        })
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    credentials: SpotifyCredentials,
    limit: u32,
}

impl SpotifyClient {
    pub fn new(credentials: SpotifyCredentials, limit: u32) -> Self {
        Self {
            credentials,
            limit: limit.clamp(1, 50),
        }
    }

    /// Builds a client and acquires its first token. An error here means the
    /// catalog should be treated as unavailable for the session.
    pub async fn connect(credentials: SpotifyCredentials, limit: u32) -> Result<Self, CatalogError> {
        let client = Self::new(credentials, limit);
        client.ensure_token().await?;
        tracing::info!("Spotify token acquired");
        Ok(client)
    }

    fn cache_key(&self) -> String {
        self.credentials.client_id.clone()
    }

    fn cached_token(&self) -> Option<AccessToken> {
        let cache = TOKEN_CACHE.lock().unwrap_or_else(|e| e.into_inner());
        cache
            .get(&self.cache_key())
            .filter(|token| token.is_fresh(Utc::now()))
            .cloned()
    }

    fn clear_token(&self) {
        let mut cache = TOKEN_CACHE.lock().unwrap_or_else(|e| e.into_inner());
        cache.remove(&self.cache_key());
    }

    async fn ensure_token(&self) -> Result<AccessToken, CatalogError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let token = self.request_token().await?;
        let mut cache = TOKEN_CACHE.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(self.cache_key(), token.clone());
        Ok(token)
    }

    async fn request_token(&self) -> Result<AccessToken, CatalogError> {
        let response = HTTP_CLIENT
            .post(TOKEN_URL)
            .header(AUTHORIZATION, basic_auth_header(&self.credentials))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        AccessToken::from_response(parsed, Utc::now())
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{SEARCH_URL}?q={}&type=track&limit={}",
            urlencoding::encode(query),
            self.limit
        )
    }

    pub async fn search_tracks(&self, query: &str) -> Result<Vec<Candidate>, CatalogError> {
        let token = self.ensure_token().await?;
        let response = HTTP_CLIENT
            .get(self.search_url(query))
            .header(AUTHORIZATION, format!("Bearer {}", token.value))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.as_u16() == 401 {
            // Revoked or expired early; the next search fetches a new one.
            self.clear_token();
        }
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        parse_search_response(&body)
    }
}

impl CatalogSearch for SpotifyClient {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, CatalogError> {
        self.search_tracks(query).await
    }
}

fn basic_auth_header(credentials: &SpotifyCredentials) -> String {
    let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", BASE64.encode(raw.as_bytes()))
}

fn status_error(status: u16, body: &str) -> CatalogError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|parsed| parsed.error.message().to_string())
        .unwrap_or_else(|_| "Unknown error".to_string());
    CatalogError::Status { status, message }
}

pub(crate) fn parse_search_response(body: &str) -> Result<Vec<Candidate>, CatalogError> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    let mut seen = Vec::<Candidate>::new();
    for track in parsed.tracks.unwrap_or_default().items {
        let name = track.display_name();
        if !name.is_empty() && !seen.contains(&name) {
            seen.push(name);
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SpotifyCredentials {
        SpotifyCredentials::new("client", "secret").unwrap()
    }

    #[test]
    fn basic_auth_is_base64_of_id_and_secret() {
        assert_eq!(
            basic_auth_header(&credentials()),
            "Basic Y2xpZW50OnNlY3JldA=="
        );
    }

    #[test]
    fn search_url_encodes_query_and_limit() {
        let client = SpotifyClient::new(credentials(), 10);
        assert_eq!(
            client.search_url("rock & roll"),
            "https://api.spotify.com/v1/search?q=rock%20%26%20roll&type=track&limit=10"
        );
        assert_eq!(SpotifyClient::new(credentials(), 0).limit, 1);
    }

    #[test]
    fn search_response_maps_to_display_names() {
        let body = r#"{
            "tracks": {
                "items": [
                    {"name": "Levitating", "artists": [{"name": "Dua Lipa"}]},
                    {"name": "Levitating", "artists": [{"name": "Dua Lipa"}]},
                    {"name": "Shallow", "artists": [{"name": "Lady Gaga"}, {"name": "Bradley Cooper"}]}
                ]
            }
        }"#;
        assert_eq!(
            parse_search_response(body).unwrap(),
            vec![
                "Levitating - Dua Lipa".to_string(),
                "Shallow - Lady Gaga, Bradley Cooper".to_string(),
            ]
        );
    }

    #[test]
    fn missing_tracks_is_empty_and_garbage_is_an_error() {
        assert!(parse_search_response("{}").unwrap().is_empty());
        assert!(matches!(
            parse_search_response("<html>"),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn status_errors_carry_api_message() {
        let err = status_error(401, r#"{"error":{"status":401,"message":"Invalid access token"}}"#);
        assert!(matches!(
            err,
            CatalogError::Status { status: 401, ref message } if message == "Invalid access token"
        ));
        let err = status_error(500, "oops");
        assert!(matches!(err, CatalogError::Status { status: 500, .. }));
    }

    #[test]
    fn token_freshness_respects_margin() {
        let now = Utc::now();
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".to_string(),
                token_type: Some("Bearer".to_string()),
                expires_in: Some(3600),
            },
            now,
        )
        .unwrap();
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + ChronoDuration::seconds(3600 - 10)));
    }

    #[test]
    fn empty_or_odd_tokens_are_rejected() {
        let now = Utc::now();
        let empty = AccessToken::from_response(
            TokenResponse {
                access_token: "  ".to_string(),
                token_type: None,
                expires_in: None,
            },
            now,
        );
        assert!(matches!(empty, Err(CatalogError::MissingToken)));

        let odd = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".to_string(),
                token_type: Some("mac".to_string()),
                expires_in: None,
            },
            now,
        );
        assert!(matches!(odd, Err(CatalogError::Decode(_))));
    }
}
