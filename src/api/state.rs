use std::sync::Arc;

use crate::services::Recommender;

/// Shared application state
///
/// The recommender is read-only after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl AppState {
    pub fn new(recommender: Recommender, default_top_n: usize, max_top_n: usize) -> Self {
        Self {
            recommender: Arc::new(recommender),
            default_top_n,
            max_top_n,
        }
    }
}
