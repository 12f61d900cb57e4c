pub mod stt;

mod app;
mod commands;
pub mod engine;
pub mod error;
pub mod settings;

pub use app::run;
