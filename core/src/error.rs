//! Library-level error types. The planner itself is pure and infallible
//! (§4.5); these errors only arise in the I/O-touching layers (admission,
//! content comparison, link execution).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("link {from} -> {to} failed: {source}")]
    Link {
        from: std::path::PathBuf,
        to: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rename of temp link onto {to} failed: {source}")]
    Rename {
        to: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
