//! Idempotent extraction of bundled assets into the writable app data tree.
//!
//! A logical path is classified once as file-shaped or directory-shaped,
//! mapped to a target under the extraction root, and materialized only when
//! the target is not already present with the expected kind. Directory
//! extraction mirrors the source tree entry by entry; each entry is probed
//! with a listing and falls back to a direct copy when the probe fails.
//! Nothing is ever deleted here, and partial state left behind by a failed
//! extraction is not rolled back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::assets::AssetStore;

/// Bucket used when a logical path has a single segment and therefore does
/// not carry its own top-level directory.
pub const DEFAULT_ASSET_BUCKET: &str = "models";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("asset path not found: {asset} ({source})")]
    AssetNotFound {
        asset: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy asset {asset}: {source}")]
    Copy {
        asset: String,
        #[source]
        source: io::Error,
    },

    #[error(
        "failed to extract asset file {asset}: direct copy failed ({direct}), \
         and extracting its parent directory also failed ({parent})"
    )]
    ParentRecovery {
        asset: String,
        direct: io::Error,
        parent: Box<ExtractError>,
    },

    #[error(
        "asset file {asset} still missing after extracting its parent directory \
         (direct copy failed: {direct})"
    )]
    MissingAfterRecovery { asset: String, direct: io::Error },

    #[error(
        "failed to copy asset entry {asset}: listing it as a directory failed \
         ({probe}) and direct copy failed ({copy})"
    )]
    AmbiguousEntry {
        asset: String,
        probe: io::Error,
        copy: io::Error,
    },

    #[error("I/O error under the extraction root: {0}")]
    Io(#[from] io::Error),
}

/// Per-entry outcome of the listing probe during directory mirroring.
enum EntryKind {
    Directory,
    /// The probe failed; the entry is treated as a leaf and copied directly.
    Leaf(io::Error),
}

/// Materialize `logical` from the asset store into `extract_root` and return
/// the absolute target path. Already-extracted targets short-circuit without
/// touching the asset store.
pub fn extract_asset(
    store: &AssetStore,
    extract_root: &Path,
    logical: &str,
) -> Result<PathBuf, ExtractError> {
    let segments: Vec<&str> = logical.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(ExtractError::AssetNotFound {
            asset: logical.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "empty asset path"),
        });
    }

    // A segment with an extension marks the whole path as file-shaped.
    // Dotfiles do not count. Classified once, for the full path.
    let file_shaped = segments
        .iter()
        .any(|s| s.contains('.') && !s.starts_with('.'));

    let (bucket, rest): (&str, &[&str]) = if segments.len() > 1 {
        (segments[0], &segments[1..])
    } else {
        (DEFAULT_ASSET_BUCKET, &segments[..])
    };

    let mut target = extract_root.join(bucket);
    for segment in rest {
        target.push(segment);
    }

    if file_shaped {
        extract_file(store, logical, &segments, &target)
    } else {
        extract_dir(store, logical, &target)
    }
}

fn extract_file(
    store: &AssetStore,
    logical: &str,
    segments: &[&str],
    target: &Path,
) -> Result<PathBuf, ExtractError> {
    if target.is_file() {
        log::debug!("asset file already extracted: {}", target.display());
        return Ok(target.to_path_buf());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let direct = match copy_leaf(store, logical, target) {
        Ok(()) => {
            log::info!("extracted asset file {logical} to {}", target.display());
            return Ok(target.to_path_buf());
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => err,
        Err(err) => {
            return Err(ExtractError::Copy {
                asset: logical.to_string(),
                source: err,
            })
        }
    };

    // The namespace reports the leaf as absent. The real asset may live one
    // level deeper than the logical path implies, so mirror the parent
    // directory and re-check the target.
    let parent_logical = segments[..segments.len() - 1].join("/");
    if parent_logical.is_empty() {
        return Err(ExtractError::Copy {
            asset: logical.to_string(),
            source: direct,
        });
    }

    let parent_target = match target.parent() {
        Some(parent) => parent.to_path_buf(),
        None => {
            return Err(ExtractError::Copy {
                asset: logical.to_string(),
                source: direct,
            })
        }
    };

    log::debug!(
        "direct copy of {logical} failed ({direct}); mirroring parent directory {parent_logical}"
    );

    match mirror_dir(store, &parent_logical, &parent_target) {
        Ok(()) => {
            if target.is_file() {
                log::info!(
                    "recovered asset file {logical} via parent directory extraction"
                );
                Ok(target.to_path_buf())
            } else {
                Err(ExtractError::MissingAfterRecovery {
                    asset: logical.to_string(),
                    direct,
                })
            }
        }
        Err(parent) => Err(ExtractError::ParentRecovery {
            asset: logical.to_string(),
            direct,
            parent: Box::new(parent),
        }),
    }
}

fn extract_dir(
    store: &AssetStore,
    logical: &str,
    target: &Path,
) -> Result<PathBuf, ExtractError> {
    if target.is_dir() {
        log::debug!("asset directory already extracted: {}", target.display());
        return Ok(target.to_path_buf());
    }

    mirror_dir(store, logical, target)?;
    log::info!("extracted asset directory {logical} to {}", target.display());
    Ok(target.to_path_buf())
}

/// Recursively mirror a source directory into `target`. The source is listed
/// before the target directory is created, so a missing asset never leaves a
/// directory behind that would satisfy the kind-based short-circuit.
fn mirror_dir(store: &AssetStore, logical: &str, target: &Path) -> Result<(), ExtractError> {
    let entries = store.list(logical).map_err(|source| ExtractError::AssetNotFound {
        asset: logical.to_string(),
        source,
    })?;

    fs::create_dir_all(target)?;

    for name in entries {
        let child_logical = format!("{logical}/{name}");
        let child_target = target.join(&name);

        match probe_entry(store, &child_logical) {
            EntryKind::Directory => mirror_dir(store, &child_logical, &child_target)?,
            EntryKind::Leaf(probe) => {
                // Leaf copies are copy-if-absent, which keeps retries of a
                // partially mirrored directory convergent.
                if child_target.is_file() {
                    continue;
                }
                if let Err(copy) = copy_leaf(store, &child_logical, &child_target) {
                    return Err(ExtractError::AmbiguousEntry {
                        asset: child_logical,
                        probe,
                        copy,
                    });
                }
            }
        }
    }

    Ok(())
}

fn probe_entry(store: &AssetStore, logical: &str) -> EntryKind {
    match store.list(logical) {
        Ok(_) => EntryKind::Directory,
        Err(err) => EntryKind::Leaf(err),
    }
}

fn copy_leaf(store: &AssetStore, logical: &str, target: &Path) -> io::Result<()> {
    let mut input = store.open(logical)?;
    let mut output = fs::File::create(target)?;
    io::copy(&mut input, &mut output)?;
    Ok(())
}
