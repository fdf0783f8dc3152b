//! Wire types for the Jikan v4 REST API.
//!
//! Only the fields the recommender reads are modeled; everything else in the
//! payload is ignored. Genre and image fields of an anime default to empty so a
//! sparse entry still deserializes, but a favorites payload without its `anime`
//! list is malformed.

use serde::Deserialize;

use super::{Anime, Genre, UserProfile};

/// GET /top/anime
#[derive(Debug, Clone, Deserialize)]
pub struct JikanTopAnimeResponse {
    pub data: Vec<JikanAnime>,
}

/// GET /anime/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnimeResponse {
    pub data: JikanAnime,
}

/// GET /users/{username}/full
///
/// Read best-effort: the call is an existence check, so every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanUserResponse {
    #[serde(default)]
    pub data: JikanUser,
}

/// GET /users/{username}/favorites
#[derive(Debug, Clone, Deserialize)]
pub struct JikanFavoritesResponse {
    pub data: JikanFavorites,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u64,
    pub title: String,
    #[serde(default)]
    pub images: Option<JikanImages>,
    #[serde(default)]
    pub genres: Vec<JikanEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImages {
    pub jpg: Option<JikanImageSet>,
    pub webp: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Genre, studio, producer... all share this shape
#[derive(Debug, Clone, Deserialize)]
pub struct JikanEntity {
    pub mal_id: Option<u64>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanUser {
    #[serde(default)]
    pub mal_id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanFavorites {
    pub anime: Vec<JikanFavoriteEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanFavoriteEntry {
    pub mal_id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

impl JikanImages {
    /// Standard-size JPEG cover, falling back to WebP
    fn cover_url(&self) -> Option<String> {
        self.jpg
            .as_ref()
            .and_then(|set| set.image_url.clone())
            .or_else(|| self.webp.as_ref().and_then(|set| set.image_url.clone()))
    }
}

impl From<JikanAnime> for Anime {
    fn from(anime: JikanAnime) -> Self {
        Anime {
            id: anime.mal_id,
            title: anime.title,
            image_url: anime.images.as_ref().and_then(JikanImages::cover_url),
            genres: anime
                .genres
                .into_iter()
                .map(|genre| Genre(genre.name))
                .collect(),
        }
    }
}

impl JikanUser {
    /// Profile for `requested`, preferring the canonical name Jikan reports
    pub fn into_profile(self, requested: &str) -> UserProfile {
        UserProfile {
            username: self.username.unwrap_or_else(|| requested.to_string()),
            mal_id: self.mal_id,
        }
    }
}

impl JikanFavorites {
    pub fn anime_ids(&self) -> Vec<u64> {
        self.anime.iter().map(|fav| fav.mal_id).collect()
    }
}
