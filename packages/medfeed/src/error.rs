use serde::Serialize;
use thiserror::Error;

use crate::core::FeedSource;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Date formatting error: {0}")]
    Format(#[from] time::error::Format),

    #[error(transparent)]
    Source(Box<SourceError>),
}

impl From<SourceError> for Error {
    fn from(err: SourceError) -> Self {
        Error::Source(Box::new(err))
    }
}

/// A failure that ends the run of a single source.
#[derive(Debug, Error)]
#[error("Error from source {site}: {kind:?} - {message}")]
pub struct SourceError {
    kind: SourceErrorKind,
    site: String,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    /// The listing page, or the frame embedded in it, could not be loaded.
    Load,
    /// A listing carries an invalid selector, date pattern or URL.
    Config,
}

impl SourceError {
    pub fn load<T: FeedSource>(message: String) -> Self {
        Self {
            kind: SourceErrorKind::Load,
            site: T::IDENTIFIER.to_string(),
            message,
        }
    }

    pub fn config<T: FeedSource>(message: String) -> Self {
        Self {
            kind: SourceErrorKind::Config,
            site: T::IDENTIFIER.to_string(),
            message,
        }
    }

    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn site(&self) -> &str {
        &self.site
    }
}
