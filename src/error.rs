//! Error handling for the item manager

use std::fmt;
use thiserror::Error;

use item_manager_api::ApiError;

use crate::navigation::RouteError;

/// Unified error type for the item manager
#[derive(Error, Debug)]
pub enum Error {
    /// Failures reported by the item backend or the transport to it
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Network client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
