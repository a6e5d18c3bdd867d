pub mod client;
pub mod config;
pub mod storage;
pub mod tones;

pub use client::GenerationClient;
pub use client::GenerationError;
pub use config::Config;
pub use tones::Tone;
pub use tones::ToneCatalog;
pub use tones::ToneError;
