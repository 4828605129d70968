//! Entry-field parsing.
//!
//! Pipeline: raw text → (accepted hint | delimited | plain name) → field
//! fallback from seed → frequency extraction + normalization → pediatric flag

mod entry;
mod frequency;
mod strength;

pub use entry::*;
pub use frequency::*;
pub use strength::*;

use thiserror::Error;

/// Parser errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No name could be derived from the entry text")]
    MissingName,
}

pub type ParseResult<T> = Result<T, ParseError>;
