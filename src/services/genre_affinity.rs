use std::collections::{HashMap, HashSet};

use crate::models::{Anime, Genre};

/// Tuning for the relative genre cutoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityConfig {
    /// A genre qualifies when its count reaches this fraction of the top count
    pub threshold_ratio: f64,
    /// The cutoff never drops below this many occurrences
    pub min_count: usize,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: 0.6,
            min_count: 1,
        }
    }
}

impl AffinityConfig {
    /// `max(min_count, floor(max_frequency * threshold_ratio))`
    pub fn threshold(&self, max_frequency: usize) -> usize {
        let relative = (max_frequency as f64 * self.threshold_ratio).floor() as usize;
        relative.max(self.min_count)
    }
}

/// Occurrence count of every genre across a user's favorites
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreFrequency {
    counts: HashMap<Genre, usize>,
}

impl GenreFrequency {
    /// Counts every genre occurrence across the given genre lists
    pub fn from_genre_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = Vec<Genre>>,
    {
        let counts = lists
            .into_iter()
            .flatten()
            .fold(HashMap::new(), |mut counts, genre| {
                *counts.entry(genre).or_insert(0) += 1;
                counts
            });

        Self { counts }
    }

    pub fn count(&self, genre: &Genre) -> usize {
        self.counts.get(genre).copied().unwrap_or(0)
    }

    /// Highest count, or 0 when no genre was seen
    pub fn max_frequency(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Genres whose count meets the configured cutoff
    pub fn qualifying(&self, config: &AffinityConfig) -> QualifyingGenres {
        let threshold = config.threshold(self.max_frequency());

        let genres = self
            .counts
            .iter()
            .filter(|(_, count)| **count >= threshold)
            .map(|(genre, _)| genre.clone())
            .collect();

        QualifyingGenres { genres, threshold }
    }
}

/// The genres a user is considered to like
#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingGenres {
    genres: HashSet<Genre>,
    threshold: usize,
}

impl QualifyingGenres {
    pub fn contains(&self, genre: &Genre) -> bool {
        self.genres.contains(genre)
    }

    /// True when the anime shares at least one genre with the set
    pub fn matches(&self, anime: &Anime) -> bool {
        anime.genres.iter().any(|genre| self.contains(genre))
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Sorted copy, for logging
    pub fn sorted(&self) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self.genres.iter().cloned().collect();
        genres.sort();
        genres
    }
}
