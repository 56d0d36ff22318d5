//! Error types for pathwise.

/// The primary error type used throughout pathwise.
#[derive(Debug, thiserror::Error)]
pub enum PathwiseError {
    #[error("unrecognized command: {0}")]
    UnrecognizedCommand(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, PathwiseError>`.
pub type PathwiseResult<T> = Result<T, PathwiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PathwiseError::Protocol("line exceeds 8192 bytes".into());
        assert_eq!(err.to_string(), "protocol error: line exceeds 8192 bytes");

        let err = PathwiseError::UnrecognizedCommand("FLY AWAY".into());
        assert_eq!(err.to_string(), "unrecognized command: FLY AWAY");

        let err = PathwiseError::InvalidConfig("server.port must be > 0".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: server.port must be > 0"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: PathwiseError = io.into();
        assert!(matches!(err, PathwiseError::Io(_)));
        assert_eq!(err.to_string(), "io error: pipe closed");
    }
}
