use serde::{Deserialize, Serialize};

/// A movie in the catalog
///
/// `index` is the row position shared by the catalog and the similarity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub index: usize,
    pub title: String,
    pub poster_path: Option<String>,
}

/// One catalog entry as stored in the catalog artifact
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieRecord {
    pub fn from_entry(index: usize, entry: CatalogEntry) -> Self {
        Self {
            index,
            title: entry.title,
            poster_path: entry.poster_path,
        }
    }

    /// Poster path, if present and not blank
    pub fn usable_poster_path(&self) -> Option<&str> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }
}

/// A single recommended movie returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationEntry {
    pub title: String,
    pub poster: String,
}

// ============================================================================
// HTTP request/response types
// ============================================================================

/// Body of `POST /recommend`, also used as the query of `GET /recommend`
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub movie_name: String,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub input_movie: String,
    pub recommendations: Vec<RecommendationEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoviesResponse {
    pub movies: Vec<String>,
}
