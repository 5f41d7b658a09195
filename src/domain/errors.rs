//! Internal error taxonomy.
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! `TraceError` never crosses the public dispatcher API: every fallible
//! internal operation is caught at its call site and logged, per the
//! best-effort contract in the crate's top-level docs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("tracing already initialized")]
    AlreadyInitialized,

    #[error("tracing not initialized")]
    NotInitialized,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_initialized_display() {
        assert_eq!(
            TraceError::AlreadyInitialized.to_string(),
            "tracing already initialized"
        );
    }

    #[test]
    fn io_error_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TraceError = io.into();
        assert!(err.to_string().contains("missing"));
    }
}
