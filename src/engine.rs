//! High-level speech recognition engine facade.
//!
//! Owns the one process-wide recognizer behind a mutex. The lifecycle is
//! explicit: `initialize` before first use (re-initializing releases the
//! previous recognizer first), `release` is an idempotent teardown.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use crate::stt::{detect_model_layout, EngineError, ModelKind, OfflineRecognizer};

#[derive(Default)]
pub struct SttEngine {
    recognizer: Mutex<Option<OfflineRecognizer>>,
}

impl SttEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.recognizer
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    pub fn initialize(
        &self,
        model_dir: &Path,
        prefer_int8: Option<bool>,
        kind: ModelKind,
    ) -> Result<(), EngineError> {
        if !model_dir.is_dir() {
            return Err(EngineError::ModelDirMissing(model_dir.to_path_buf()));
        }

        let layout = detect_model_layout(model_dir, prefer_int8, kind)?;

        let start = Instant::now();
        let recognizer = OfflineRecognizer::new(&layout)?;
        log::info!(
            "sherpa-onnx recognizer ready from {} in {:?}",
            model_dir.display(),
            start.elapsed()
        );

        let mut guard = self.recognizer.lock().map_err(|_| EngineError::Busy)?;
        // Dropping the previous recognizer releases its native resources.
        *guard = Some(recognizer);
        Ok(())
    }

    pub fn transcribe_file(&self, audio_path: &Path) -> Result<String, EngineError> {
        let guard = self.recognizer.lock().map_err(|_| EngineError::Busy)?;
        let recognizer = guard.as_ref().ok_or(EngineError::NotInitialized)?;

        let start = Instant::now();
        let text = recognizer.transcribe_file(audio_path)?;
        log::info!(
            "transcribed {} in {:?}",
            audio_path.display(),
            start.elapsed()
        );
        Ok(text)
    }

    /// Idempotent teardown; releasing an unloaded engine is a no-op.
    pub fn release(&self) {
        if let Ok(mut guard) = self.recognizer.lock() {
            if guard.take().is_some() {
                log::info!("released sherpa-onnx recognizer");
            }
        }
    }
}
