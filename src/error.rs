use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core library errors
#[derive(Error, Debug)]
pub enum SweeperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {0}")]
    AccessDenied(PathBuf),

    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Trash already holds an entry named '{0}'")]
    Collision(PathBuf),

    #[error("Destination is already occupied: {0}")]
    DestinationConflict(PathBuf),

    #[error("No files to compute statistics over")]
    EmptyPopulation,

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

impl SweeperError {
    /// Classify an IO failure on `path` into the matching variant.
    pub fn from_io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => SweeperError::AccessDenied(path),
            io::ErrorKind::NotFound => SweeperError::NotFound(path),
            _ => SweeperError::Io { path, source },
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SweeperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ConfigError::Invalid("retention_days must be at least 1".into());
        assert!(err.to_string().contains("retention_days"));
    }

    #[test]
    fn error_conversion() {
        let config_err = ConfigError::Invalid("test".into());
        let sweeper_err: SweeperError = config_err.into();
        assert!(matches!(sweeper_err, SweeperError::Config(_)));
    }

    #[test]
    fn from_io_classifies_kinds() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            SweeperError::from_io("/x", denied),
            SweeperError::AccessDenied(p) if p == Path::new("/x")
        ));

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            SweeperError::from_io("/y", missing),
            SweeperError::NotFound(_)
        ));

        let other = io::Error::new(io::ErrorKind::Other, "cross-device");
        assert!(matches!(
            SweeperError::from_io("/z", other),
            SweeperError::Io { .. }
        ));
    }
}
