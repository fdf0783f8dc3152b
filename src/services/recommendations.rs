use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Anime, Genre, RecommendationResult, RecommendedAnime},
    services::{
        genre_affinity::{AffinityConfig, GenreFrequency, QualifyingGenres},
        providers::AnimeDataSource,
    },
};

/// In-band message shown in place of recommendations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidUsername,
    CatalogUnavailable,
    UserUnavailable(String),
    FavoritesUnavailable(String),
    NoRecommendations,
    Unexpected(String),
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::InvalidUsername => write!(f, "Please enter a valid username."),
            Notice::CatalogUnavailable => write!(f, "Failed to fetch popular anime."),
            Notice::UserUnavailable(username) => {
                write!(f, "Failed to fetch data for user '{}'.", username)
            }
            Notice::FavoritesUnavailable(username) => {
                write!(f, "Failed to fetch favorites for user '{}'.", username)
            }
            Notice::NoRecommendations => write!(f, "No recommendations found."),
            Notice::Unexpected(message) => write!(f, "Unexpected error: {}", message),
        }
    }
}

impl From<Notice> for RecommendationResult {
    fn from(notice: Notice) -> Self {
        RecommendationResult::notice(notice.to_string())
    }
}

/// Why a run stopped before reaching the catalog filter
enum Halt {
    Notice(Notice),
    Error(AppError),
}

impl From<AppError> for Halt {
    fn from(error: AppError) -> Self {
        Halt::Error(error)
    }
}

/// Turns an "upstream unavailable" failure of a required call into its notice
trait RequiredCall<T> {
    fn or_halt(self, notice: impl FnOnce() -> Notice) -> Result<T, Halt>;
}

impl<T> RequiredCall<T> for AppResult<T> {
    fn or_halt(self, notice: impl FnOnce() -> Notice) -> Result<T, Halt> {
        self.map_err(|e| {
            if e.is_upstream_unavailable() {
                Halt::Notice(notice())
            } else {
                Halt::Error(e)
            }
        })
    }
}

/// Generates recommendations from a user's favorite genres
///
/// The catalog of currently popular anime is filtered down to the entries
/// sharing at least one genre with the user's qualifying genres (see
/// [`GenreFrequency::qualifying`]).
pub struct RecommendationEngine {
    data_source: Arc<dyn AnimeDataSource>,
    affinity: AffinityConfig,
}

impl RecommendationEngine {
    pub fn new(data_source: Arc<dyn AnimeDataSource>, affinity: AffinityConfig) -> Self {
        Self {
            data_source,
            affinity,
        }
    }

    /// Recommends popular anime for `username`
    ///
    /// Never fails: every error is reported as a single placeholder entry.
    pub async fn recommend(&self, username: &str) -> RecommendationResult {
        let username = username.trim();
        if username.is_empty() {
            return Notice::InvalidUsername.into();
        }

        match self.run(username).await {
            Ok(result) => result,
            Err(Halt::Notice(notice)) => {
                tracing::warn!(
                    username = %username,
                    provider = self.data_source.name(),
                    notice = %notice,
                    "Recommendation aborted"
                );
                notice.into()
            }
            Err(Halt::Error(e)) => {
                tracing::error!(
                    username = %username,
                    provider = self.data_source.name(),
                    error = %e,
                    "Recommendation failed unexpectedly"
                );
                Notice::Unexpected(e.to_string()).into()
            }
        }
    }

    async fn run(&self, username: &str) -> Result<RecommendationResult, Halt> {
        let catalog = self
            .data_source
            .fetch_top_anime()
            .await
            .or_halt(|| Notice::CatalogUnavailable)?;

        self.data_source
            .fetch_user_profile(username)
            .await
            .or_halt(|| Notice::UserUnavailable(username.to_string()))?;

        let favorite_ids = self
            .data_source
            .fetch_user_favorites(username)
            .await
            .or_halt(|| Notice::FavoritesUnavailable(username.to_string()))?;

        // One at a time, in favorites order; unavailable entries contribute nothing
        let mut favorite_genres = Vec::with_capacity(favorite_ids.len());
        for id in favorite_ids {
            match self.data_source.fetch_anime_detail(id).await {
                Ok(anime) => favorite_genres.push(Some(anime.genres)),
                Err(e) if e.is_upstream_unavailable() => {
                    tracing::debug!(anime_id = id, error = %e, "Skipping favorite");
                    favorite_genres.push(None);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let fetched = favorite_genres.iter().filter(|g| g.is_some()).count();
        let frequency = GenreFrequency::from_genre_lists(favorite_genres.into_iter().flatten());
        let qualifying = frequency.qualifying(&self.affinity);

        tracing::info!(
            username = %username,
            favorites_fetched = fetched,
            distinct_genres = frequency.len(),
            max_frequency = frequency.max_frequency(),
            threshold = qualifying.threshold(),
            qualifying = ?qualifying.sorted(),
            "Genre affinity computed"
        );

        let result = select_recommendations(catalog, &qualifying);

        tracing::info!(
            username = %username,
            recommendations = result.animes.iter().filter(|a| !a.is_placeholder()).count(),
            "Recommendations generated"
        );

        Ok(result)
    }
}

/// Keeps catalog entries sharing a genre with `qualifying`, in catalog order
pub fn select_recommendations(
    catalog: Vec<Anime>,
    qualifying: &QualifyingGenres,
) -> RecommendationResult {
    let animes: Vec<RecommendedAnime> = catalog
        .into_iter()
        .filter(|anime| qualifying.matches(anime))
        .map(RecommendedAnime::from)
        .collect();

    if animes.is_empty() {
        return Notice::NoRecommendations.into();
    }

    let genres: Vec<Genre> = {
        let mut seen = HashSet::new();
        animes
            .iter()
            .flat_map(|anime| anime.genres.iter())
            .filter(|genre| seen.insert(*genre))
            .cloned()
            .collect()
    };

    RecommendationResult { animes, genres }
}
