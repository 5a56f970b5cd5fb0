use std::{fmt, io};

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum TmapError {
    #[error("Name already taken: {0}")]
    Conflict(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("Filter '{expr}' failed to compile: {reason}")]
    FilterCompile { expr: String, reason: String },
    #[error("Node filter cannot be rewritten: {0}")]
    FilterRewrite(String),
    #[error("Invalid edge: {0}")]
    InvalidEdge(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Edge change log consumer lagged behind by {0} entries")]
    Lagged(u64),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("The view '{0}' is protected and cannot be renamed or deleted")]
    ProtectedView(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl TmapError {
    pub fn filter_compile<E: Into<String>, R: fmt::Display>(expr: E, reason: R) -> Self {
        TmapError::FilterCompile {
            expr: expr.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors the user can fix from the UI; the host surfaces these as notifications.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TmapError::Conflict(_)
                | TmapError::FilterCompile { .. }
                | TmapError::FilterRewrite(_)
                | TmapError::InvalidEdge(_)
                | TmapError::ProtectedView(_)
        )
    }
}

impl From<toml::de::Error> for TmapError {
    fn from(src: toml::de::Error) -> TmapError {
        TmapError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for TmapError {
    fn from(src: toml::ser::Error) -> TmapError {
        TmapError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for TmapError {
    fn from(src: JsonError) -> TmapError {
        TmapError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<uuid::Error> for TmapError {
    fn from(src: uuid::Error) -> TmapError {
        TmapError::Serialization(format!("UUID conversion failed: {src}"))
    }
}

impl From<RegexError> for TmapError {
    fn from(x: RegexError) -> Self {
        TmapError::Serialization(format!("Regex parse failed: {x}"))
    }
}

impl From<io::Error> for TmapError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => TmapError::NotFound(format!("{x}")),
            _ => TmapError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for TmapError {
    fn from(x: fmt::Error) -> Self {
        TmapError::Custom(format!("{x}"))
    }
}
