// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line errors.

use ordoplay_interchange_graph::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the command line tool
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing a file failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Scene file could not be parsed
    #[error("Invalid scene file {path}: {source}")]
    Scene {
        /// Scene file
        path: PathBuf,
        /// Parse error
        source: ron::error::SpannedError,
    },

    /// Scene could not be written
    #[error("Failed to serialize scene: {0}")]
    SceneWrite(#[from] ron::Error),

    /// Document is not valid JSON
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for command line operations
pub type Result<T> = std::result::Result<T, AppError>;
