//! Error types for Terrascape

use thiserror::Error;

/// Main error type for the demo
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Shader error in {label}: {message}")]
    Shader { label: String, message: String },

    #[error("Invalid grid {columns}x{rows}: {reason}")]
    InvalidGrid { columns: u32, rows: u32, reason: &'static str },

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Invalid generation settings: {0}")]
    InvalidSettings(String),

    #[error("Scene not loaded: cannot {0} before load")]
    NotLoaded(&'static str),

    #[error("Scene already loaded")]
    AlreadyLoaded,
}
