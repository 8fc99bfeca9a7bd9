//! Model registry and path resolution.
//!
//! [`WHISPER_MODELS`] lists the standard multilingual Whisper GGML files the
//! server knows how to load.  Exactly one of them is configured per process
//! (`[stt] model`, default `whisper-base`).
//!
//! [`ModelPaths`] resolves the on-disk location of a model given an
//! [`crate::config::AppPaths`] instance.

use std::path::PathBuf;

use crate::config::AppPaths;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A registered GGML model: config id and file name under the models dir.
#[derive(Debug)]
pub struct ModelInfo {
    /// Identifier used in `SttConfig::model` (e.g. `"whisper-base"`).
    pub id: &'static str,
    /// File name under the models directory (e.g. `"ggml-base.bin"`).
    pub file_name: &'static str,
}

/// Standard OpenAI Whisper models converted to GGML by whisper.cpp.
pub const WHISPER_MODELS: &[ModelInfo] = &[
    ModelInfo { id: "whisper-tiny", file_name: "ggml-tiny.bin" },
    ModelInfo { id: "whisper-base", file_name: "ggml-base.bin" },
    ModelInfo { id: "whisper-small", file_name: "ggml-small.bin" },
    ModelInfo { id: "whisper-medium", file_name: "ggml-medium.bin" },
    ModelInfo { id: "whisper-large-v3", file_name: "ggml-large-v3.bin" },
];

/// Find a [`ModelInfo`] by its `id` string.
pub fn find_model_by_id(id: &str) -> Option<&'static ModelInfo> {
    WHISPER_MODELS.iter().find(|m| m.id == id)
}

// ---------------------------------------------------------------------------
// ModelPaths
// ---------------------------------------------------------------------------

/// Resolves the on-disk location of model files from [`AppPaths`].
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Directory that contains (or will contain) GGML `.bin` files.
    pub models_dir: PathBuf,
}

impl ModelPaths {
    /// Build a [`ModelPaths`] from the application's [`AppPaths`].
    pub fn from_app_paths(app_paths: &AppPaths) -> Self {
        Self {
            models_dir: app_paths.models_dir.clone(),
        }
    }

    /// Construct directly from a models directory path.
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Full path to the GGML file for the given model.
    pub fn model_path(&self, model: &ModelInfo) -> PathBuf {
        self.models_dir.join(model.file_name)
    }

    /// Resolve a configured model id to a path.
    ///
    /// Registry ids map to their GGML file name; anything else is treated as
    /// a file stem under the models directory (`<id>.bin`), so custom GGML
    /// conversions can be dropped in without a registry entry.
    pub fn resolve(&self, id: &str) -> PathBuf {
        match find_model_by_id(id) {
            Some(model) => self.model_path(model),
            None => self.models_dir.join(format!("{id}.bin")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
