//! error detail types wrapped by [`Error`](crate::Error)

use crate::prelude::*;

/// A call into the storage engine reported a failure
#[derive(Display, Debug, Constructor)]
#[display(fmt = "Error in {operation}: {source}")]
pub struct EngineFailure {
    operation: &'static str,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl EngineFailure {
    /// name of the engine call that failed
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl std::error::Error for EngineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// An operation was called out of sequence or with arguments that can never be valid.
///
/// These are detected before the engine is called.
#[derive(Debug, thiserror::Error)]
pub enum LogicError {
    #[error("Calling {operation} with non-{required:?} file access (file is {actual:?}).")]
    WrongAccess {
        operation: &'static str,
        required: FileAccess,
        actual: FileAccess,
    },
    #[error("Calling {operation} on a file that is not opened.")]
    NotOpened { operation: &'static str },
    #[error("Calling {operation} before init.")]
    NotInitialized { operation: &'static str },
    #[error("A file is already opened, close it first.")]
    AlreadyOpened,
    #[error("The length of {left} ({left_len}) must be equal to the length of {right} ({right_len}).")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },
    #[error("Invalid argument to {operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },
}

/// Positional access past the end of a collection
#[derive(Display, Debug, Constructor)]
#[display(fmt = "Index out of range '{index}' ({what} has {len} entries)")]
pub struct OutOfRange {
    what: &'static str,
    index: usize,
    len: usize,
}

impl std::error::Error for OutOfRange {}

/// attach the name of the failing engine call to an engine result
pub(crate) trait Check<T> {
    fn check(self, operation: &'static str) -> Result<T, Error>;
}

impl<T, E> Check<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn check(self, operation: &'static str) -> Result<T, Error> {
        self.map_err(|err| Error::from(EngineFailure::new(operation, Box::new(err))))
    }
}

pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Error {
    Error::from(OutOfRange::new(what, index, len))
}

pub(crate) fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Error {
    Error::from(LogicError::InvalidArgument {
        operation,
        reason: reason.into(),
    })
}
