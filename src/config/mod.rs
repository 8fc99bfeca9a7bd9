//! Configuration module for Note-fy.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the web server,
//! the generation service and the STT engine, `AppPaths` for cross-platform
//! data directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, LlmConfig, LlmProvider, ServerConfig, SttConfig};
