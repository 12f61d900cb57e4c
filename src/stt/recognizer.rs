//! Thin wrapper over the sherpa-onnx offline recognizer C API.
//!
//! The recognizer itself (acoustic models, decoding graphs, ONNX execution)
//! is entirely sherpa-onnx territory; this module only marshals validated
//! paths and audio samples across the FFI boundary.

use std::ffi::{CStr, CString};
use std::path::{Path, PathBuf};

use sherpa_rs::sherpa_rs_sys as sys;
use thiserror::Error;

use super::layout::{LayoutError, ModelFiles, ModelLayout};

const MAX_THREADS: usize = 4;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("model layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("model directory does not exist or is not a directory: {0}")]
    ModelDirMissing(PathBuf),

    #[error("failed to create sherpa-onnx offline recognizer (tokens: {0})")]
    RecognizerCreate(PathBuf),

    #[error("audio file does not exist: {0}")]
    AudioFileMissing(PathBuf),

    #[error("failed to decode audio file {path}: {reason}")]
    Audio { path: PathBuf, reason: String },

    #[error("path contains characters not representable across the FFI boundary: {0}")]
    InvalidPath(PathBuf),

    #[error("recognizer is not initialized; call initialize first")]
    NotInitialized,

    #[error("the speech engine is busy; try again")]
    Busy,
}

pub struct OfflineRecognizer {
    recognizer: *const sys::SherpaOnnxOfflineRecognizer,
    // The C API keeps borrowed pointers into these for its whole lifetime.
    _cstrings: Vec<CString>,
}

// The raw pointer is owned exclusively by this struct and the C API has no
// thread affinity for offline recognizers.
unsafe impl Send for OfflineRecognizer {}

impl Drop for OfflineRecognizer {
    fn drop(&mut self) {
        unsafe { sys::SherpaOnnxDestroyOfflineRecognizer(self.recognizer) };
    }
}

fn path_cstring(path: &Path) -> Result<CString, EngineError> {
    let text = path
        .to_str()
        .ok_or_else(|| EngineError::InvalidPath(path.to_path_buf()))?;
    CString::new(text).map_err(|_| EngineError::InvalidPath(path.to_path_buf()))
}

impl OfflineRecognizer {
    pub fn new(layout: &ModelLayout) -> Result<Self, EngineError> {
        let tokens_c = path_cstring(&layout.tokens)?;
        let mut cstrings = vec![tokens_c.clone()];

        let threads = num_cpus::get().min(MAX_THREADS) as i32;

        let mut model_config: sys::SherpaOnnxOfflineModelConfig = unsafe { std::mem::zeroed() };
        model_config.tokens = tokens_c.as_ptr();
        model_config.num_threads = threads;
        model_config.provider = c"cpu".as_ptr();
        model_config.debug = 0;

        match &layout.files {
            ModelFiles::Transducer {
                encoder,
                decoder,
                joiner,
            } => {
                let encoder_c = path_cstring(encoder)?;
                let decoder_c = path_cstring(decoder)?;
                let joiner_c = path_cstring(joiner)?;
                model_config.transducer.encoder = encoder_c.as_ptr();
                model_config.transducer.decoder = decoder_c.as_ptr();
                model_config.transducer.joiner = joiner_c.as_ptr();
                cstrings.extend([encoder_c, decoder_c, joiner_c]);
            }
            ModelFiles::Paraformer { model } => {
                let model_c = path_cstring(model)?;
                model_config.paraformer.model = model_c.as_ptr();
                cstrings.push(model_c);
            }
            ModelFiles::NemoCtc { model } => {
                let model_c = path_cstring(model)?;
                model_config.nemo_ctc.model = model_c.as_ptr();
                cstrings.push(model_c);
            }
        }

        let mut config: sys::SherpaOnnxOfflineRecognizerConfig = unsafe { std::mem::zeroed() };
        config.feat_config.sample_rate = 16_000;
        config.feat_config.feature_dim = 80;
        config.model_config = model_config;
        config.decoding_method = c"greedy_search".as_ptr();

        log::info!(
            "creating offline recognizer: tokens={}, threads={}",
            layout.tokens.display(),
            threads
        );

        let recognizer = unsafe { sys::SherpaOnnxCreateOfflineRecognizer(&config) };
        if recognizer.is_null() {
            return Err(EngineError::RecognizerCreate(layout.tokens.clone()));
        }

        Ok(Self {
            recognizer,
            _cstrings: cstrings,
        })
    }

    pub fn transcribe_file(&self, path: &Path) -> Result<String, EngineError> {
        if !path.is_file() {
            return Err(EngineError::AudioFileMissing(path.to_path_buf()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| EngineError::InvalidPath(path.to_path_buf()))?;

        let (samples, sample_rate) =
            sherpa_rs::read_audio_file(path_str).map_err(|err| EngineError::Audio {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        if samples.is_empty() {
            return Err(EngineError::Audio {
                path: path.to_path_buf(),
                reason: "file decoded to zero samples".to_string(),
            });
        }

        unsafe {
            let stream = sys::SherpaOnnxCreateOfflineStream(self.recognizer);
            sys::SherpaOnnxAcceptWaveformOffline(
                stream,
                sample_rate as i32,
                samples.as_ptr(),
                samples.len() as i32,
            );
            sys::SherpaOnnxDecodeOfflineStream(self.recognizer, stream);

            let result = sys::SherpaOnnxGetOfflineStreamResult(stream);
            let text = if result.is_null() || (*result).text.is_null() {
                String::new()
            } else {
                CStr::from_ptr((*result).text).to_string_lossy().into_owned()
            };

            if !result.is_null() {
                sys::SherpaOnnxDestroyOfflineRecognizerResult(result);
            }
            sys::SherpaOnnxDestroyOfflineStream(stream);

            Ok(text)
        }
    }
}
