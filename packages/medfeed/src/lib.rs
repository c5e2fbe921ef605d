pub mod core;
pub mod error;
pub mod extract;
pub mod fetch;

pub use crate::core::FeedCore;

pub use error::Error;
pub use error::SourceError;
pub use error::SourceErrorKind;
