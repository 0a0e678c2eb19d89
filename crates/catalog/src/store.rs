//! Movie Collection Module
//!
//! This module holds the ordered, in-memory sequence of movie records. It has
//! no locking of its own; [`crate::MovieService`] owns the store behind a lock
//! and is the only writer.

use std::collections::HashSet;

use marquee_protocol::Movie;
use thiserror::Error;

/// Store-related errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate movie id: {id}")]
    DuplicateId { id: String },

    #[error("Invalid movie {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Serialization error: {source}")]
    SerializationError { source: serde_json::Error },

    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError { source: err }
    }
}

/// Ordered collection of movie records
#[derive(Debug, Clone, Default)]
pub struct MovieStore {
    movies: Vec<Movie>,
}

impl MovieStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, keeping their order.
    ///
    /// Fails if two records share an id or a record has no genre.
    pub fn from_movies(movies: Vec<Movie>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(movies.len());
        for movie in &movies {
            if !seen.insert(movie.id.as_str()) {
                return Err(StoreError::DuplicateId {
                    id: movie.id.clone(),
                });
            }
            if movie.genre.is_empty() {
                return Err(StoreError::InvalidRecord {
                    id: movie.id.clone(),
                    reason: "genre list is empty".to_string(),
                });
            }
        }

        Ok(Self { movies })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Every record, in collection order
    pub fn all(&self) -> &[Movie] {
        &self.movies
    }

    /// Records tagged with `genre` (case-insensitive), in collection order
    pub fn filter_by_genre(&self, genre: &str) -> Vec<Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.has_genre(genre))
            .cloned()
            .collect()
    }

    /// Look up a record by exact id
    pub fn get(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Index of the record with `id`, if present
    pub fn position(&self, id: &str) -> Option<usize> {
        self.movies.iter().position(|movie| movie.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Append a record. The caller guarantees the id is not already present.
    pub fn push(&mut self, movie: Movie) {
        debug_assert!(!self.contains(&movie.id));
        self.movies.push(movie);
    }

    /// Overwrite the record at `index`, returning the previous one.
    pub fn replace_at(&mut self, index: usize, movie: Movie) -> Option<Movie> {
        self.movies
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, movie))
    }
}
