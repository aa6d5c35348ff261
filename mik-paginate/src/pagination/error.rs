//! Errors surfaced by pagination operations.

use thiserror::Error;

use crate::compile::CompileError;

/// Error type for pagination operations.
///
/// `E` is the collection's own error type; it passes through unmodified.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaginateError<E> {
    /// A `bw` / `nbw` filter was not given a two-element value.
    #[error("range filter on `{field}` expects a two-element value")]
    MalformedRange {
        /// Logical field name of the offending filter.
        field: String,
    },

    /// The collection failed to execute a query.
    #[error(transparent)]
    Execution(E),
}

impl<E> From<CompileError> for PaginateError<E> {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::MalformedRange { field } => Self::MalformedRange { field },
        }
    }
}

impl<E> PaginateError<E> {
    /// The collection error, if this is an execution failure.
    pub const fn execution(&self) -> Option<&E> {
        match self {
            Self::Execution(err) => Some(err),
            Self::MalformedRange { .. } => None,
        }
    }
}
