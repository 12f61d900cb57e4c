//! Model asset resolution, extraction, and the sherpa-onnx recognizer.

mod assets;
mod extract;
mod layout;
mod recognizer;
mod resolve;

pub use assets::AssetStore;
pub use extract::{extract_asset, ExtractError, DEFAULT_ASSET_BUCKET};
pub use layout::{detect_model_layout, LayoutError, ModelFiles, ModelKind, ModelLayout};
pub use recognizer::{EngineError, OfflineRecognizer};
pub use resolve::{
    resolve_audio_file, resolve_model_dir, ModelPathConfig, PathSource, ResolveError,
};
