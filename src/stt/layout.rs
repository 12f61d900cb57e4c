//! Detects which sherpa-onnx model layout lives inside a resolved directory.
//!
//! Pure filesystem probing; nothing here touches ONNX runtime state, so the
//! selection logic stays testable without model weights.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Explicit model family, or `Auto` to detect from the files present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Transducer,
    Paraformer,
    NemoCtc,
    #[default]
    Auto,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transducer => "transducer",
            Self::Paraformer => "paraformer",
            Self::NemoCtc => "nemo_ctc",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Model files selected for one recognizer instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFiles {
    Transducer {
        encoder: PathBuf,
        decoder: PathBuf,
        joiner: PathBuf,
    },
    Paraformer {
        model: PathBuf,
    },
    NemoCtc {
        model: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct ModelLayout {
    pub tokens: PathBuf,
    pub files: ModelFiles,
}

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("tokens file not found: {0}")]
    TokensNotFound(PathBuf),

    #[error("model type '{kind}' requested but its required files are missing in {dir}")]
    KindMismatch { kind: ModelKind, dir: PathBuf },

    #[error("no usable model files found in {dir}; checked: {checked}")]
    NoModelFiles { dir: PathBuf, checked: String },
}

/// Pick between the quantized and regular single-file models.
///
/// `prefer_int8` is a tri-state: `Some(true)` tries int8 first, `Some(false)`
/// tries the regular model first, `None` defaults to int8 first. Either way
/// the other variant is the fallback.
fn pick_single_model(dir: &Path, prefer_int8: Option<bool>) -> Option<PathBuf> {
    let int8 = dir.join("model.int8.onnx");
    let regular = dir.join("model.onnx");
    let order = match prefer_int8 {
        Some(false) => [regular, int8],
        _ => [int8, regular],
    };
    order.into_iter().find(|candidate| candidate.is_file())
}

/// Directory names carrying these hints are treated as NeMo CTC exports when
/// auto-detecting, since their single-file layout is indistinguishable from
/// a Paraformer export.
fn looks_like_ctc(dir: &Path) -> bool {
    let name = dir.to_string_lossy().to_lowercase();
    ["nemo", "ctc", "parakeet"]
        .iter()
        .any(|hint| name.contains(hint))
}

pub fn detect_model_layout(
    dir: &Path,
    prefer_int8: Option<bool>,
    kind: ModelKind,
) -> Result<ModelLayout, LayoutError> {
    let tokens = dir.join("tokens.txt");
    if !tokens.is_file() {
        return Err(LayoutError::TokensNotFound(tokens));
    }

    let encoder = dir.join("encoder.onnx");
    let decoder = dir.join("decoder.onnx");
    let joiner = dir.join("joiner.onnx");
    let has_transducer = encoder.is_file() && decoder.is_file() && joiner.is_file();
    let single_model = pick_single_model(dir, prefer_int8);

    let files = match kind {
        ModelKind::Transducer => {
            if !has_transducer {
                return Err(LayoutError::KindMismatch {
                    kind,
                    dir: dir.to_path_buf(),
                });
            }
            ModelFiles::Transducer {
                encoder,
                decoder,
                joiner,
            }
        }
        ModelKind::Paraformer => {
            let model = single_model.ok_or_else(|| LayoutError::KindMismatch {
                kind,
                dir: dir.to_path_buf(),
            })?;
            ModelFiles::Paraformer { model }
        }
        ModelKind::NemoCtc => {
            let model = single_model.ok_or_else(|| LayoutError::KindMismatch {
                kind,
                dir: dir.to_path_buf(),
            })?;
            ModelFiles::NemoCtc { model }
        }
        ModelKind::Auto => {
            if has_transducer {
                log::info!("auto-detected transducer model in {}", dir.display());
                ModelFiles::Transducer {
                    encoder,
                    decoder,
                    joiner,
                }
            } else if let Some(model) = single_model {
                if looks_like_ctc(dir) {
                    log::info!("auto-detected NeMo CTC model: {}", model.display());
                    ModelFiles::NemoCtc { model }
                } else {
                    log::info!("auto-detected Paraformer model: {}", model.display());
                    ModelFiles::Paraformer { model }
                }
            } else {
                let checked = [
                    dir.join("model.int8.onnx"),
                    dir.join("model.onnx"),
                    encoder,
                    decoder,
                    joiner,
                ]
                .iter()
                .map(|p| {
                    format!(
                        "{} (exists: {})",
                        p.display(),
                        if p.is_file() { "yes" } else { "no" }
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");

                return Err(LayoutError::NoModelFiles {
                    dir: dir.to_path_buf(),
                    checked,
                });
            }
        }
    };

    Ok(ModelLayout { tokens, files })
}
