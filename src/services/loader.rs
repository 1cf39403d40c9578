use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::{
    error::DataError,
    models::{CatalogEntry, MovieRecord},
    services::recommender::{PosterUrls, Recommender, SimilarityTable},
};

/// Source of the offline-built catalog and similarity artifacts
///
/// The server reads JSON files; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactSource {
    /// Catalog entries in row order
    fn catalog(&self) -> Result<Vec<CatalogEntry>, DataError>;

    /// Similarity rows aligned with the catalog
    fn similarity(&self) -> Result<SimilarityTable, DataError>;
}

/// Artifacts stored as JSON files on disk
#[derive(Debug, Clone)]
pub struct JsonArtifacts {
    catalog_path: PathBuf,
    similarity_path: PathBuf,
    vectorizer_path: Option<PathBuf>,
}

impl JsonArtifacts {
    pub fn new(catalog_path: impl Into<PathBuf>, similarity_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            similarity_path: similarity_path.into(),
            vectorizer_path: None,
        }
    }

    /// Require the feature vectorizer from the offline pipeline to be present.
    /// Its contents are never read.
    pub fn with_vectorizer(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectorizer_path = Some(path.into());
        self
    }

    /// Checks that the vectorizer artifact, if configured, is an existing file
    pub fn check_vectorizer(&self) -> Result<(), DataError> {
        let Some(path) = &self.vectorizer_path else {
            return Ok(());
        };

        let metadata = std::fs::metadata(path).map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;

        if !metadata.is_file() {
            return Err(DataError::NotAFile { path: path.clone() });
        }

        tracing::info!(
            path = %path.display(),
            bytes = metadata.len(),
            "Vectorizer artifact present (unused at runtime)"
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl ArtifactSource for JsonArtifacts {
    fn catalog(&self) -> Result<Vec<CatalogEntry>, DataError> {
        read_json(&self.catalog_path)
    }

    fn similarity(&self) -> Result<SimilarityTable, DataError> {
        read_json(&self.similarity_path)
    }
}

/// Loads both artifacts and validates them together into a [`Recommender`]
pub fn load_recommender(
    source: &dyn ArtifactSource,
    posters: PosterUrls,
) -> Result<Recommender, DataError> {
    let catalog: Vec<MovieRecord> = source
        .catalog()?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| MovieRecord::from_entry(index, entry))
        .collect();

    tracing::info!(movie_count = catalog.len(), "Catalog loaded");

    let similarity = source.similarity()?;

    tracing::info!(row_count = similarity.len(), "Similarity table loaded");

    Recommender::new(catalog, similarity, posters)
}
