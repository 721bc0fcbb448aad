use thiserror::Error;

use crate::types::{MovieId, UserId};

pub type CineResult<T> = Result<T, CineError>;

#[derive(Error, Debug)]
pub enum CineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Movie {0} is not in the similarity index")]
    MovieNotFound(MovieId),

    #[error("User {0} is not in the rating matrix")]
    UserNotFound(UserId),

    #[error("User {0} has no usable ratings to recommend from")]
    InsufficientRatings(UserId),

    #[error("Movie {0} has no rating signal to compare against")]
    InsufficientSignal(MovieId),

    #[error("Invalid rating {value}: {reason}")]
    InvalidRating { value: f64, reason: String },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
