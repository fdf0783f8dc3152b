/// Anime data provider abstraction
///
/// The recommendation engine only talks to this trait, so the Jikan client can
/// be swapped for a stub in tests or for another MyAnimeList mirror.
use crate::{
    error::AppResult,
    models::{Anime, AnimeId, UserProfile},
};

pub mod jikan;

pub use jikan::JikanProvider;

/// Source of the catalogs the recommender works on
///
/// Every method maps a non-success upstream status to
/// [`AppError::UpstreamStatus`](crate::error::AppError::UpstreamStatus); the
/// engine relies on that to tell "unavailable" apart from "malformed".
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AnimeDataSource: Send + Sync {
    /// Currently top-ranked anime, in ranking order
    async fn fetch_top_anime(&self) -> AppResult<Vec<Anime>>;

    /// Profile lookup, used only to check that the user exists
    async fn fetch_user_profile(&self, username: &str) -> AppResult<UserProfile>;

    /// Ids of the anime the user marked as favorite
    async fn fetch_user_favorites(&self, username: &str) -> AppResult<Vec<AnimeId>>;

    /// Full record of one anime, including its genres
    async fn fetch_anime_detail(&self, id: AnimeId) -> AppResult<Anime>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
