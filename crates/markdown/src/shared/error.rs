//! Fatal conversion errors.
//!
//! Malformed Markdown never produces an error; it degrades to literal text.
//! Every error here is an internal invariant violation or a caller contract
//! violation, and aborts the whole conversion.

use thiserror::Error;

/// Coarse classification of a fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidState,
    OutOfRange,
    InvalidArgument,
    InfiniteLoop,
    UnsupportedConfiguration,
}

/// Cursor failures raised by the scanner primitives.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unexpected end of input at position {position}")]
    EndOfInput { position: usize },
    #[error("cannot back up {count} positions from position {position}")]
    InvalidBacktrack { position: usize, count: usize },
    #[error("invalid cursor argument: {0}")]
    InvalidArgument(&'static str),
    #[error("position {position} revisited {visits} times without progress")]
    InfiniteLoop { position: usize, visits: u32 },
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::EndOfInput { .. } | ScanError::InvalidBacktrack { .. } => {
                ErrorKind::OutOfRange
            }
            ScanError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ScanError::InfiniteLoop { .. } => ErrorKind::InfiniteLoop,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("no rule for {token} in {state}")]
    InvalidState { state: &'static str, token: String },
    #[error("invalid {what}: {value:?}")]
    InvalidArgument { what: &'static str, value: String },
    #[error("node {node} is out of range for a document of {len} nodes")]
    NodeOutOfRange { node: usize, len: usize },
    #[error("unsupported option {0:?}: no options are recognized")]
    UnsupportedConfiguration(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Scan(err) => err.kind(),
            Error::InvalidState { .. } => ErrorKind::InvalidState,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::NodeOutOfRange { .. } => ErrorKind::OutOfRange,
            Error::UnsupportedConfiguration(_) => ErrorKind::UnsupportedConfiguration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_keep_their_kind_through_conversion() {
        let err: Error = ScanError::InvalidBacktrack {
            position: 0,
            count: 1,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let err: Error = ScanError::InfiniteLoop {
            position: 3,
            visits: 6,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InfiniteLoop);
        assert_eq!(err.to_string(), "position 3 revisited 6 times without progress");
    }

    #[test]
    fn configuration_errors_are_classified() {
        let err = Error::UnsupportedConfiguration("smart_quotes".to_string());
        assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
    }
}
