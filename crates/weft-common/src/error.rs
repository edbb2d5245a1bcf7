//! Unified error types for the weft workspace.
//!
//! A "not found" answer from the controller is never represented here: reads
//! return a tagged lookup result instead, and only genuine failures become
//! errors.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum WeftError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value or operation input is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid input.
        message: String,
    },

    /// A required resource was not found where one must exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// The controller or dataplane agent API failed.
    #[error("controller API error: {message}")]
    Api {
        /// Description of the failure as reported by the remote side.
        message: String,
    },

    /// An OS command exited with a nonzero status.
    #[error("command `{command}` failed with status {status}: {stderr}")]
    Command {
        /// The command line that was executed.
        command: String,
        /// Exit status code, or -1 when terminated by a signal.
        status: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, WeftError>;
