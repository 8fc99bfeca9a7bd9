//! STT (Speech-to-Text) engine module.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                  SttEngine (trait)                     │
//! │                                                       │
//! │   ┌─────────────┐    ┌──────────────┐                 │
//! │   │  ModelPaths  │───▶│ WhisperEngine│                 │
//! │   │ - resolve    │    │ - ctx        │                 │
//! │   └─────────────┘    │ - params     │                 │
//! │                       └──────┬───────┘                 │
//! │                              ▼                         │
//! │        audio::load_for_whisper(path) → transcribe      │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use notefy::stt::{ModelPaths, SttEngine, TranscribeParams, WhisperEngine};
//! use notefy::config::AppPaths;
//!
//! let models = ModelPaths::from_app_paths(&AppPaths::new());
//! let engine = WhisperEngine::load(models.resolve("whisper-base"), TranscribeParams::default())
//!     .expect("model not found");
//!
//! let result = engine.transcribe(Path::new("lecture.mp3")).unwrap();
//! println!("{}", result.text);
//! ```

pub mod engine;
pub mod model;
pub mod transcribe;

pub use engine::{SttEngine, SttError, WhisperEngine};
pub use model::{find_model_by_id, ModelInfo, ModelPaths, WHISPER_MODELS};
pub use transcribe::{Segment, TranscribeParams, TranscriptionResult};

#[cfg(test)]
pub use engine::MockSttEngine;
