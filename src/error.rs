use thiserror::Error;

use crate::stt::{EngineError, ExtractError, ResolveError};

/// Unified app errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Path resolution: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Extraction: {0}")]
    Extract(#[from] ExtractError),

    #[error("Engine: {0}")]
    Engine(#[from] EngineError),

    #[error("Settings: {0}")]
    Settings(String),

    #[error("Runtime: {0}")]
    Runtime(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
