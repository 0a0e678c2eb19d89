//! In-memory movie catalog
//!
//! This crate owns the movie collection: the ordered store, the seed dataset
//! it starts from, and the service operations that read and mutate it.

pub mod seed;
pub mod service;
pub mod store;

// Re-export key types
pub use service::MovieService;
pub use store::{MovieStore, StoreError};
