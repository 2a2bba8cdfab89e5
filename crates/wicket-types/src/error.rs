//! Error types for the wicket widget.

use std::io;

/// Errors produced by the wicket framework.
#[derive(Debug, thiserror::Error)]
pub enum WicketError {
    #[error("command error: {0}")]
    Command(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("markup error: {0}")]
    Markup(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WicketError>;
