//! Item-based collaborative filtering engine: rating store, dense
//! rating matrix, item-item cosine table, and the query/write facade
//! that keeps them consistent.

pub mod catalog;
pub mod engine;
pub mod matrix;
pub mod similarity;
pub mod store;

pub use catalog::Catalog;
pub use engine::{EngineStats, Recommender, MAX_RATING_VALUE, MIN_RATING_VALUE};
pub use matrix::RatingMatrix;
pub use similarity::{CosineSimilarity, ItemSimilarity, SimilarityMatrix};
pub use store::RatingStore;
