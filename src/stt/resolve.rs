//! Turns a `{type, path}` configuration into a verified absolute path.
//!
//! Model resolution is directory-oriented, audio resolution file-oriented;
//! the two share the same dispatch and differ only in the kind check at the
//! end. Nothing is cached between calls: the writable area can be cleared
//! externally, so existence is re-validated on every resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::assets::AssetStore;
use super::extract::{extract_asset, ExtractError};

/// Where a configured path should be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSource {
    /// Bundled in the read-only resource namespace; extracted on first use.
    Asset,
    /// Already on the filesystem; validated, never written.
    File,
    /// Asset first, filesystem second.
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPathConfig {
    #[serde(rename = "type")]
    pub source: PathSource,
    pub path: String,
}

impl ModelPathConfig {
    pub fn new(source: PathSource, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid path config: {0}")]
    InvalidArgument(String),

    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("path is not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("asset extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("path not found as asset or file: {path}. Asset error: {asset}. File error: {file}")]
    NoMatch {
        path: String,
        asset: Box<ResolveError>,
        file: Box<ResolveError>,
    },

    #[error("could not absolutize path {path}: {source}")]
    Absolutize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What kind of filesystem object a resolution must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WantKind {
    Directory,
    File,
}

/// Resolve a model directory. Fails unless the result exists and is a
/// directory at the moment of return.
pub fn resolve_model_dir(
    store: &AssetStore,
    extract_root: &Path,
    config: &ModelPathConfig,
) -> Result<PathBuf, ResolveError> {
    resolve(store, extract_root, config, WantKind::Directory)
}

/// Resolve a single audio file. Fails unless the result exists and is a
/// regular file at the moment of return.
pub fn resolve_audio_file(
    store: &AssetStore,
    extract_root: &Path,
    config: &ModelPathConfig,
) -> Result<PathBuf, ResolveError> {
    resolve(store, extract_root, config, WantKind::File)
}

fn resolve(
    store: &AssetStore,
    extract_root: &Path,
    config: &ModelPathConfig,
    want: WantKind,
) -> Result<PathBuf, ResolveError> {
    if config.path.trim().is_empty() {
        return Err(ResolveError::InvalidArgument(
            "path must not be empty".to_string(),
        ));
    }

    match config.source {
        PathSource::Asset => resolve_asset(store, extract_root, &config.path, want),
        PathSource::File => resolve_file(&config.path, want),
        PathSource::Auto => {
            match resolve_asset(store, extract_root, &config.path, want) {
                Ok(path) => Ok(path),
                Err(asset_err) => {
                    log::debug!(
                        "auto resolution: asset branch failed for {} ({asset_err}), trying filesystem",
                        config.path
                    );
                    match resolve_file(&config.path, want) {
                        Ok(path) => Ok(path),
                        Err(file_err) => Err(ResolveError::NoMatch {
                            path: config.path.clone(),
                            asset: Box::new(asset_err),
                            file: Box::new(file_err),
                        }),
                    }
                }
            }
        }
    }
}

fn resolve_asset(
    store: &AssetStore,
    extract_root: &Path,
    logical: &str,
    want: WantKind,
) -> Result<PathBuf, ResolveError> {
    let extracted = extract_asset(store, extract_root, logical)?;
    check_kind(&extracted, want)?;
    absolutize(&extracted)
}

fn resolve_file(path: &str, want: WantKind) -> Result<PathBuf, ResolveError> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(ResolveError::PathNotFound(path.to_path_buf()));
    }
    check_kind(path, want)?;
    absolutize(path)
}

fn check_kind(path: &Path, want: WantKind) -> Result<(), ResolveError> {
    match want {
        WantKind::Directory if !path.is_dir() => {
            Err(ResolveError::NotADirectory(path.to_path_buf()))
        }
        WantKind::File if !path.is_file() => Err(ResolveError::NotAFile(path.to_path_buf())),
        _ => Ok(()),
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ResolveError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(path).map_err(|source| ResolveError::Absolutize {
        path: path.to_path_buf(),
        source,
    })
}
