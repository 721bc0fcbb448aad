//! MovieLens-format dataset loading and the built-in sample fallback.

pub mod loader;
pub mod sample;

pub use loader::{load_movies, load_ratings, Dataset};
