//! Common error types

use thiserror::Error;

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;
