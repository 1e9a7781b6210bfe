use strum_macros::Display;
use thiserror::Error;

/// Failure modes of a catalog fetch. Only surfaced to callers when no earlier
/// successful fetch can be served instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Connection timeout - the model catalog is taking too long to respond")]
    Timeout,

    #[error("API Error: {message}")]
    Http { status: Option<u16>, message: String },

    #[error("Invalid response format from the model catalog: {0}")]
    Malformed(String),

    #[error("The model catalog returned no free models")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CatalogErrorKind {
    Timeout,
    HttpError,
    Malformed,
    Empty,
}

impl CatalogError {
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            CatalogError::Timeout => CatalogErrorKind::Timeout,
            CatalogError::Http { .. } => CatalogErrorKind::HttpError,
            CatalogError::Malformed(_) => CatalogErrorKind::Malformed,
            CatalogError::Empty => CatalogErrorKind::Empty,
        }
    }
}
