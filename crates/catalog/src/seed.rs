//! Seed dataset loading.
//!
//! The collection starts from a JSON array of complete movie records. The
//! default dataset is compiled into the crate; an alternative file can be
//! supplied at startup.

use std::fs;
use std::path::Path;

use marquee_protocol::Movie;
use tracing::debug;

use crate::store::{MovieStore, StoreError};

/// Dataset bundled with the crate
pub const DEFAULT_SEED: &str = include_str!("../data/movies.json");

/// Load the bundled dataset
pub fn load_default() -> Result<MovieStore, StoreError> {
    load_from_str(DEFAULT_SEED)
}

/// Parse a JSON array of movie records into a store
pub fn load_from_str(json: &str) -> Result<MovieStore, StoreError> {
    let movies: Vec<Movie> = serde_json::from_str(json)?;
    debug!("Parsed {} seed movies", movies.len());
    MovieStore::from_movies(movies)
}

/// Read and parse a seed file
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<MovieStore, StoreError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_from_str(&json)
}
