use std::cmp::Ordering;

use crate::{
    error::DataError,
    models::{MovieRecord, RecommendationEntry},
};

/// Precomputed pairwise similarity scores, one row per catalog entry
pub type SimilarityTable = Vec<Vec<f64>>;

pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_PLACEHOLDER_POSTER_URL: &str =
    "https://via.placeholder.com/500x750?text=No+Image";

/// How poster paths are turned into full image URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterUrls {
    pub base_url: String,
    pub placeholder_url: String,
}

impl Default for PosterUrls {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_POSTER_BASE_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_POSTER_URL.to_string(),
        }
    }
}

/// Content-based recommender over a fixed catalog and similarity table
///
/// Both structures are validated together on construction and never change
/// afterwards, so a single instance can be shared across all request handlers.
#[derive(Debug)]
pub struct Recommender {
    catalog: Vec<MovieRecord>,
    /// Lowercased titles, aligned with `catalog`
    lowercase_titles: Vec<String>,
    similarity: SimilarityTable,
    posters: PosterUrls,
}

impl Recommender {
    /// Builds a recommender, rejecting records whose index is not their position
    /// and similarity tables that do not line up with the catalog or that
    /// contain non-finite scores.
    pub fn new(
        catalog: Vec<MovieRecord>,
        similarity: SimilarityTable,
        posters: PosterUrls,
    ) -> Result<Self, DataError> {
        if let Some((position, movie)) = catalog
            .iter()
            .enumerate()
            .find(|(position, movie)| movie.index != *position)
        {
            return Err(DataError::IndexMismatch {
                position,
                index: movie.index,
            });
        }

        if similarity.len() != catalog.len() {
            return Err(DataError::RowCountMismatch {
                catalog: catalog.len(),
                rows: similarity.len(),
            });
        }

        for (row, scores) in similarity.iter().enumerate() {
            if scores.len() != catalog.len() {
                return Err(DataError::RowLengthMismatch {
                    row,
                    expected: catalog.len(),
                    actual: scores.len(),
                });
            }
            if let Some(column) = scores.iter().position(|score| !score.is_finite()) {
                return Err(DataError::NonFiniteScore { row, column });
            }
        }

        let lowercase_titles = catalog
            .iter()
            .map(|movie| movie.title.to_lowercase())
            .collect();

        Ok(Self {
            catalog,
            lowercase_titles,
            similarity,
            posters,
        })
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// All catalog titles in stored order
    pub fn titles(&self) -> Vec<&str> {
        self.catalog.iter().map(|movie| movie.title.as_str()).collect()
    }

    /// Index of the first movie whose title matches, ignoring case
    pub fn find_index_by_title(&self, title: &str) -> Option<usize> {
        let wanted = title.to_lowercase();
        self.lowercase_titles
            .iter()
            .position(|lowered| *lowered == wanted)
    }

    /// Returns up to `top_n` movies most similar to `title`, or `None` when the
    /// title is not in the catalog.
    ///
    /// The highest ranked entry is dropped as the movie itself. This relies on
    /// the self-score being the row maximum and is not checked by identity.
    pub fn recommend(&self, title: &str, top_n: usize) -> Option<Vec<RecommendationEntry>> {
        let idx = self.find_index_by_title(title)?;
        let ranked = self.rank(idx);

        if let Some(&(first, _)) = ranked.first() {
            if first != idx {
                tracing::warn!(
                    movie_index = idx,
                    dropped_index = first,
                    "Self-score is not the row maximum; dropped entry is another movie"
                );
            }
        }

        let recommendations = ranked
            .into_iter()
            .skip(1)
            .take(top_n)
            .map(|(position, _)| {
                let movie = &self.catalog[position];
                RecommendationEntry {
                    title: movie.title.clone(),
                    poster: self.poster_for(movie.index),
                }
            })
            .collect();

        Some(recommendations)
    }

    /// Full poster URL for the movie at `index`, or the placeholder
    pub fn poster_for(&self, index: usize) -> String {
        match self.catalog.get(index).and_then(MovieRecord::usable_poster_path) {
            Some(path) => format!("{}{}", self.posters.base_url, path),
            None => self.posters.placeholder_url.clone(),
        }
    }

    /// Every catalog index paired with its score against `idx`, highest first.
    /// `sort_by` is stable, so equal scores stay in ascending index order.
    fn rank(&self, idx: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> =
            self.similarity[idx].iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, title: &str, poster_path: Option<&str>) -> MovieRecord {
        MovieRecord {
            index,
            title: title.to_string(),
            poster_path: poster_path.map(str::to_string),
        }
    }

    fn catalog(titles: &[&str]) -> Vec<MovieRecord> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| record(i, title, Some(format!("/{}.jpg", i).as_str())))
            .collect()
    }

    fn create_test_recommender() -> Recommender {
        Recommender::new(
            catalog(&["Avatar", "Titanic", "Inception"]),
            vec![
                vec![1.0, 0.2, 0.7],
                vec![0.2, 1.0, 0.1],
                vec![0.7, 0.1, 1.0],
            ],
            PosterUrls::default(),
        )
        .unwrap()
    }

    fn titles(entries: &[RecommendationEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_recommend_ranks_by_score_excluding_self() {
        let recommender = create_test_recommender();
        let result = recommender.recommend("avatar", 2).unwrap();
        assert_eq!(titles(&result), vec!["Inception", "Titanic"]);
        assert_eq!(result[0].poster, "https://image.tmdb.org/t/p/w500/2.jpg");
    }

    #[test]
    fn test_recommend_is_case_insensitive() {
        let recommender = create_test_recommender();
        for query in ["INCEPTION", "inception", "InCePtIoN"] {
            let result = recommender.recommend(query, 6).unwrap();
            assert_eq!(titles(&result), vec!["Avatar", "Titanic"]);
        }
    }

    #[test]
    fn test_recommend_unknown_title() {
        let recommender = create_test_recommender();
        assert!(recommender.recommend("Nonexistent Movie", 6).is_none());
        assert!(recommender.recommend("Nonexistent Movie", 0).is_none());
        assert!(recommender.recommend("", 6).is_none());
    }

    #[test]
    fn test_recommend_length_is_bounded_by_catalog() {
        let recommender = create_test_recommender();
        assert_eq!(recommender.recommend("Titanic", 0).unwrap().len(), 0);
        assert_eq!(recommender.recommend("Titanic", 1).unwrap().len(), 1);
        assert_eq!(recommender.recommend("Titanic", 2).unwrap().len(), 2);
        assert_eq!(recommender.recommend("Titanic", 50).unwrap().len(), 2);
    }

    #[test]
    fn test_ties_keep_ascending_index_order() {
        let recommender = Recommender::new(
            catalog(&["A", "B", "C", "D"]),
            vec![
                vec![1.0, 0.5, 0.5, 0.5],
                vec![0.5, 1.0, 0.5, 0.5],
                vec![0.5, 0.5, 1.0, 0.5],
                vec![0.5, 0.5, 0.5, 1.0],
            ],
            PosterUrls::default(),
        )
        .unwrap();

        let result = recommender.recommend("C", 6).unwrap();
        assert_eq!(titles(&result), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_self_exclusion_is_positional() {
        // Titanic scores higher against Avatar than Avatar does against itself,
        // so Titanic is dropped and Avatar stays in the results.
        let recommender = Recommender::new(
            catalog(&["Avatar", "Titanic", "Inception"]),
            vec![
                vec![0.9, 1.0, 0.7],
                vec![1.0, 1.0, 0.1],
                vec![0.7, 0.1, 1.0],
            ],
            PosterUrls::default(),
        )
        .unwrap();

        let result = recommender.recommend("Avatar", 6).unwrap();
        assert_eq!(titles(&result), vec!["Avatar", "Inception"]);
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first() {
        let recommender = Recommender::new(
            catalog(&["Solaris", "Stalker", "solaris"]),
            vec![
                vec![1.0, 0.8, 0.3],
                vec![0.8, 1.0, 0.2],
                vec![0.3, 0.2, 1.0],
            ],
            PosterUrls::default(),
        )
        .unwrap();

        assert_eq!(recommender.find_index_by_title("SOLARIS"), Some(0));
        let result = recommender.recommend("solaris", 1).unwrap();
        assert_eq!(titles(&result), vec!["Stalker"]);
    }

    #[test]
    fn test_poster_for() {
        let recommender = Recommender::new(
            vec![
                record(0, "Avatar", Some("/abc.jpg")),
                record(1, "Titanic", Some("")),
                record(2, "Inception", Some("  ")),
                record(3, "Heat", None),
            ],
            vec![vec![1.0; 4]; 4],
            PosterUrls::default(),
        )
        .unwrap();

        assert_eq!(
            recommender.poster_for(0),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        for index in 1..4 {
            assert_eq!(recommender.poster_for(index), DEFAULT_PLACEHOLDER_POSTER_URL);
        }
    }

    #[test]
    fn test_poster_for_uses_configured_urls() {
        let posters = PosterUrls {
            base_url: "http://img.local".to_string(),
            placeholder_url: "http://img.local/none.png".to_string(),
        };
        let recommender = Recommender::new(
            vec![record(0, "Avatar", Some("/a.jpg")), record(1, "Heat", None)],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            posters,
        )
        .unwrap();

        assert_eq!(recommender.poster_for(0), "http://img.local/a.jpg");
        assert_eq!(recommender.poster_for(1), "http://img.local/none.png");
    }

    #[test]
    fn test_titles_in_stored_order() {
        let recommender = create_test_recommender();
        assert_eq!(recommender.titles(), vec!["Avatar", "Titanic", "Inception"]);
        assert_eq!(recommender.len(), 3);
    }

    #[test]
    fn test_rejects_row_count_mismatch() {
        let result = Recommender::new(
            catalog(&["Avatar", "Titanic"]),
            vec![vec![1.0, 0.2]],
            PosterUrls::default(),
        );
        assert!(matches!(
            result,
            Err(DataError::RowCountMismatch {
                catalog: 2,
                rows: 1
            })
        ));
    }

    #[test]
    fn test_rejects_short_row() {
        let result = Recommender::new(
            catalog(&["Avatar", "Titanic"]),
            vec![vec![1.0, 0.2], vec![0.2]],
            PosterUrls::default(),
        );
        assert!(matches!(
            result,
            Err(DataError::RowLengthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_rejects_non_finite_score() {
        let result = Recommender::new(
            catalog(&["Avatar", "Titanic"]),
            vec![vec![1.0, 0.2], vec![f64::NAN, 1.0]],
            PosterUrls::default(),
        );
        assert!(matches!(
            result,
            Err(DataError::NonFiniteScore { row: 1, column: 0 })
        ));
    }

    #[test]
    fn test_scores_keep_double_precision() {
        // 0.3000000001 and 0.3000000002 are equal once narrowed to f32
        let recommender = Recommender::new(
            catalog(&["A", "B", "C"]),
            vec![
                vec![1.0, 0.3000000001, 0.3000000002],
                vec![0.3000000001, 1.0, 0.5],
                vec![0.3000000002, 0.5, 1.0],
            ],
            PosterUrls::default(),
        )
        .unwrap();

        let result = recommender.recommend("A", 2).unwrap();
        assert_eq!(titles(&result), vec!["C", "B"]);
    }

    #[test]
    fn test_narrow_self_score_margin_still_ranks_first() {
        let recommender = Recommender::new(
            catalog(&["A", "B"]),
            vec![vec![1.0, 0.9999999999], vec![0.9999999999, 1.0]],
            PosterUrls::default(),
        )
        .unwrap();

        // B's self-score only narrowly beats A and must still rank first
        let result = recommender.recommend("B", 1).unwrap();
        assert_eq!(titles(&result), vec!["A"]);
    }

    #[test]
    fn test_lookup_uses_unicode_lowercase() {
        let recommender = Recommender::new(
            catalog(&["Amélie", "Léon"]),
            vec![vec![1.0, 0.4], vec![0.4, 1.0]],
            PosterUrls::default(),
        )
        .unwrap();

        assert_eq!(recommender.find_index_by_title("AMÉLIE"), Some(0));
        assert_eq!(recommender.find_index_by_title("léon"), Some(1));
        assert_eq!(recommender.find_index_by_title("leon"), None);
    }

    #[test]
    fn test_rejects_index_out_of_position() {
        let result = Recommender::new(
            vec![record(0, "Avatar", None), record(2, "Titanic", None)],
            vec![vec![1.0, 0.2], vec![0.2, 1.0]],
            PosterUrls::default(),
        );
        assert!(matches!(
            result,
            Err(DataError::IndexMismatch {
                position: 1,
                index: 2
            })
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let recommender = Recommender::new(vec![], vec![], PosterUrls::default()).unwrap();
        assert!(recommender.is_empty());
        assert!(recommender.recommend("Avatar", 6).is_none());
    }
}
