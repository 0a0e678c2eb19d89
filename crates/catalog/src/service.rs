//! Movie Service Module
//!
//! This module implements the operations exposed over HTTP: list with an
//! optional genre filter, fetch by id, create, and partial update. The
//! service owns the collection; handlers share it through an `Arc`.

use marquee_protocol::{Movie, MovieError, MovieValidator, Result};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::seed;
use crate::store::{MovieStore, StoreError};

/// Owner of the movie collection
pub struct MovieService {
    /// Collection, exclusively locked for every mutation
    store: RwLock<MovieStore>,
    /// Payload schema
    validator: MovieValidator,
}

impl MovieService {
    /// Create a service over an existing store
    pub fn new(store: MovieStore) -> Self {
        Self::with_validator(store, MovieValidator::new())
    }

    pub fn with_validator(store: MovieStore, validator: MovieValidator) -> Self {
        Self {
            store: RwLock::new(store),
            validator,
        }
    }

    /// Create a service seeded with the bundled dataset
    pub fn from_default_seed() -> std::result::Result<Self, StoreError> {
        Ok(Self::new(seed::load_default()?))
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// List movies, optionally keeping only those tagged with `genre`.
    ///
    /// An absent or empty filter returns the whole collection.
    pub fn list(&self, genre: Option<&str>) -> Vec<Movie> {
        let store = self.store.read();
        match genre.filter(|g| !g.is_empty()) {
            Some(genre) => {
                let movies = store.filter_by_genre(genre);
                debug!("Genre filter '{}' matched {} movies", genre, movies.len());
                movies
            }
            None => store.all().to_vec(),
        }
    }

    /// Fetch a movie by id
    pub fn get(&self, id: &str) -> Result<Movie> {
        self.store.read().get(id).cloned().ok_or_else(|| {
            debug!("Movie {} not found", id);
            MovieError::not_found(id)
        })
    }

    /// Validate a full payload and append it under a fresh id.
    pub fn create(&self, payload: &Value) -> Result<Movie> {
        let draft = self.validator.validate(payload).map_err(|errors| {
            warn!("Rejected create payload: {:?}", errors.fields());
            MovieError::from(errors)
        })?;

        let mut store = self.store.write();
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !store.contains(&candidate) {
                break candidate;
            }
        };

        let movie = Movie::from_draft(id, draft);
        store.push(movie.clone());
        info!("Created movie {} ({})", movie.id, movie.title);

        Ok(movie)
    }

    /// Validate a partial payload and merge it over the movie with `id`.
    ///
    /// Validation runs before the lookup, so an invalid payload for an
    /// unknown id reports the validation failure.
    pub fn update(&self, id: &str, payload: &Value) -> Result<Movie> {
        let patch = self.validator.validate_partial(payload).map_err(|errors| {
            warn!("Rejected update payload for {}: {:?}", id, errors.fields());
            MovieError::from(errors)
        })?;

        let mut store = self.store.write();
        let index = store.position(id).ok_or_else(|| {
            debug!("Cannot update missing movie {}", id);
            MovieError::not_found(id)
        })?;

        let updated = store.all()[index].merged(&patch);
        store.replace_at(index, updated.clone());
        info!("Updated movie {} ({})", updated.id, updated.title);

        Ok(updated)
    }
}
