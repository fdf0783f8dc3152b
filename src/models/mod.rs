use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod jikan;

pub use jikan::{
    JikanAnime, JikanAnimeResponse, JikanEntity, JikanFavoriteEntry, JikanFavorites,
    JikanFavoritesResponse, JikanImageSet, JikanImages, JikanTopAnimeResponse, JikanUser,
    JikanUserResponse,
};

/// MyAnimeList identifier of an anime
pub type AnimeId = u64;

/// A categorical tag attached to an anime (e.g. "Action")
///
/// Equality is exact string match; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genre(pub String);

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Genre {
    fn from(name: &str) -> Self {
        Genre(name.to_string())
    }
}

impl From<String> for Genre {
    fn from(name: String) -> Self {
        Genre(name)
    }
}

/// An anime as seen by the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: AnimeId,
    pub title: String,
    pub genres: Vec<Genre>,
    pub image_url: Option<String>,
}

/// Minimal view of a user profile; only its existence matters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub mal_id: Option<u64>,
}

/// One entry of the recommendation list
///
/// Placeholder entries carry a human-readable message in `title` and have no
/// id, image or genres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAnime {
    pub mal_id: Option<AnimeId>,
    pub title: String,
    pub image_url: Option<String>,
    pub genres: Vec<Genre>,
}

impl RecommendedAnime {
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            mal_id: None,
            title: message.into(),
            image_url: None,
            genres: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.mal_id.is_none()
    }
}

impl From<Anime> for RecommendedAnime {
    fn from(anime: Anime) -> Self {
        Self {
            mal_id: Some(anime.id),
            title: anime.title,
            image_url: anime.image_url,
            genres: anime.genres,
        }
    }
}

/// Output of the recommendation engine, rendered by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub animes: Vec<RecommendedAnime>,
    /// Unique genres across `animes`, in first-seen order
    pub genres: Vec<Genre>,
}

impl RecommendationResult {
    /// A result whose single entry is a message instead of a title
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            animes: vec![RecommendedAnime::placeholder(message)],
            genres: Vec::new(),
        }
    }
}
