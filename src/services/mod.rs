pub mod genre_affinity;
pub mod providers;
pub mod recommendations;

pub use genre_affinity::{AffinityConfig, GenreFrequency, QualifyingGenres};
pub use recommendations::{Notice, RecommendationEngine};
