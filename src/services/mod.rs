pub mod loader;
pub mod recommender;

pub use loader::{load_recommender, ArtifactSource, JsonArtifacts};
pub use recommender::{PosterUrls, Recommender};
