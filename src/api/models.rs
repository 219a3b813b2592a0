// Spotify Web API payloads, trimmed to the fields we read.
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// The token endpoint returns `{"error": "invalid_client"}` while the API
/// endpoints return `{"error": {"status": 401, "message": "..."}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Detailed {
        #[serde(default)]
        status: Option<u16>,
        message: String,
    },
    Code(String),
}

impl ErrorBody {
    pub fn message(&self) -> &str {
        match self {
            Self::Detailed { message, .. } => message,
            Self::Code(code) => code,
        }
    }
}

impl Track {
    /// `"Title - Artist A, Artist B"`, the candidate string shown to the user.
    pub fn display_name(&self) -> String {
        let artists: Vec<&str> = self
            .artists
            .iter()
            .map(|artist| artist.name.trim())
            .filter(|name| !name.is_empty())
            .collect();
        if artists.is_empty() {
            self.name.trim().to_string()
        } else {
            format!("{} - {}", self.name.trim(), artists.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_joins_artists() {
        let track = Track {
            name: "Stay".to_string(),
            artists: vec![
                TrackArtist {
                    name: "The Kid LAROI".to_string(),
                },
                TrackArtist {
                    name: "Justin Bieber".to_string(),
                },
            ],
        };
        assert_eq!(track.display_name(), "Stay - The Kid LAROI, Justin Bieber");
    }

    #[test]
    fn display_name_without_artists() {
        let track = Track {
            name: " Untitled ".to_string(),
            artists: Vec::new(),
        };
        assert_eq!(track.display_name(), "Untitled");
    }

    #[test]
    fn error_bodies_parse_both_shapes() {
        let api: ErrorResponse =
            serde_json::from_str(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
                .unwrap();
        assert_eq!(api.error.message(), "The access token expired");

        let token: ErrorResponse = serde_json::from_str(r#"{"error":"invalid_client"}"#).unwrap();
        assert_eq!(token.error.message(), "invalid_client");
    }
}
