//! Error type shared by the whole crate.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid instance: {0}")]
    InvalidInstance(String),
    #[error("invalid tour: {0}")]
    InvalidTour(String),
    #[error("client {client} has demand {demand}, which exceeds the capacity {capacity}")]
    InfeasibleDemand {
        client: usize,
        demand: u64,
        capacity: u64,
    },
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logger init failed: {0}")]
    Logger(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_instance(message: impl Into<String>) -> Self {
        Self::InvalidInstance(message.into())
    }

    pub fn invalid_tour(message: impl Into<String>) -> Self {
        Self::InvalidTour(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}
