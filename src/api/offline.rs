use super::{CatalogError, CatalogSearch};
use crate::flow::Candidate;

pub const BUILTIN_SONGS: [&str; 20] = [
    "Blinding Lights - The Weeknd",
    "Levitating - Dua Lipa",
    "Shape of You - Ed Sheeran",
    "Uptown Funk - Mark Ronson ft. Bruno Mars",
    "Old Town Road - Lil Nas X",
    "Happier Than Ever - Billie Eilish",
    "Rolling in the Deep - Adele",
    "Bad Guy - Billie Eilish",
    "Stay - Justin Bieber & The Kid LAROI",
    "Can't Stop the Feeling! - Justin Timberlake",
    "Dance Monkey - Tones and I",
    "Watermelon Sugar - Harry Styles",
    "Rockstar - DaBaby ft. Roddy Ricch",
    "Savage Love - Jawsh 685 & Jason Derulo",
    "Good 4 U - Olivia Rodrigo",
    "As It Was - Harry Styles",
    "Shallow - Lady Gaga & Bradley Cooper",
    "Don't Start Now - Dua Lipa",
    "Bohemian Rhapsody - Queen",
    "Take Me To Church - Hozier",
];

/// Fixed song list filtered by case-insensitive substring match. Used when no
/// Spotify credentials are configured.
#[derive(Debug, Clone)]
pub struct OfflineCatalog {
    songs: Vec<Candidate>,
}

impl Default for OfflineCatalog {
    fn default() -> Self {
        Self::new(BUILTIN_SONGS.iter().map(|song| song.to_string()).collect())
    }
}

impl OfflineCatalog {
    pub fn new(songs: Vec<Candidate>) -> Self {
        Self { songs }
    }

    pub fn filter(&self, query: &str) -> Vec<Candidate> {
        let needle = query.trim().to_lowercase();
        self.songs
            .iter()
            .filter(|song| song.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl CatalogSearch for OfflineCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, CatalogError> {
        Ok(self.filter(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_case_insensitive() {
        let catalog = OfflineCatalog::default();
        assert_eq!(
            catalog.filter("DUA"),
            vec![
                "Levitating - Dua Lipa".to_string(),
                "Don't Start Now - Dua Lipa".to_string(),
            ]
        );
        assert!(catalog.filter("zzzz").is_empty());
    }

    #[tokio::test]
    async fn search_never_fails() {
        let catalog = OfflineCatalog::default();
        let results = catalog.search("harry").await.unwrap();
        assert_eq!(results.len(), 2);
    }
}
