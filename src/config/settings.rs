//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section is `#[serde(default)]`, so a `settings.toml` only needs the
//! keys it wants to change.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Settings for the single-page web interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Largest accepted upload, in megabytes.
    pub max_upload_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".into(),
            max_upload_mb: 200,
        }
    }
}

impl ServerConfig {
    /// Parse [`bind_addr`](Self::bind_addr) into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("invalid bind address `{}`", self.bind_addr))
    }

    /// Upload cap in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize).saturating_mul(1024 * 1024)
    }
}

// ---------------------------------------------------------------------------
// LlmProvider
// ---------------------------------------------------------------------------

/// Selects the wire format of the hosted generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` REST API.
    Gemini,
    /// Any OpenAI-compatible `/v1/chat/completions` API (OpenAI, Groq,
    /// Ollama in OpenAI mode, LM Studio …).
    OpenAiCompatible,
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

impl LlmProvider {
    /// Environment variable consulted when no API key is configured.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::Gemini => "GOOGLE_API_KEY",
            Self::OpenAiCompatible => "OPENAI_API_KEY",
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the note-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which wire format to speak.
    pub provider: LlmProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Gemini default: `https://generativelanguage.googleapis.com`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key. When `None` or empty the provider's environment variable
    /// (see [`LlmProvider::api_key_env`]) is used instead.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"gemini-2.0-flash"`).
    pub model: String,
    /// Sampling temperature. `None` leaves the provider default in place.
    pub temperature: Option<f32>,
    /// Request timeout in seconds. `None` means no client-side timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.0-flash".into(),
            temperature: None,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    /// The configured API key, falling back to the provider's environment
    /// variable. Empty strings count as absent.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(self.provider.api_key_env())
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Model id from the registry (e.g. `"whisper-base"`).
    pub model: String,
    /// Spoken language as an ISO-639-1 code, or `"auto"` for Whisper's
    /// built-in language detection.
    pub language: String,
    /// CPU threads handed to Whisper. `None` picks a value from the
    /// available parallelism.
    pub n_threads: Option<i32>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "whisper-base".into(),
            language: "auto".into(),
            n_threads: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use notefy::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Write it out somewhere else
/// config.save_to(std::path::Path::new("settings.toml")).unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Web server settings.
    pub server: ServerConfig,
    /// Generation service settings.
    pub llm: LlmConfig,
    /// STT engine settings.
    pub stt: SttConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.server.bind_addr, loaded.server.bind_addr);
        assert_eq!(original.server.max_upload_mb, loaded.server.max_upload_mb);

        assert_eq!(original.llm.provider, loaded.llm.provider);
        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.llm.timeout_secs, loaded.llm.timeout_secs);

        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(original.stt.language, loaded.stt.language);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.llm.model, default.llm.model);
        assert_eq!(config.stt.model, default.stt.model);
        assert_eq!(config.server.bind_addr, default.server.bind_addr);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8501");
        assert_eq!(cfg.server.max_upload_mb, 200);
        assert_eq!(cfg.llm.provider, LlmProvider::Gemini);
        assert_eq!(cfg.llm.model, "gemini-2.0-flash");
        assert!(cfg.llm.api_key.is_none());
        assert!(cfg.llm.timeout_secs.is_none());
        assert_eq!(cfg.stt.model, "whisper-base");
        assert_eq!(cfg.stt.language, "auto");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[llm]\nprovider = \"OpenAiCompatible\"\nbase_url = \"http://localhost:11434\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.llm.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert_eq!(cfg.llm.model, "gemini-2.0-flash");
        assert_eq!(cfg.server.max_upload_mb, 200);
        assert_eq!(cfg.stt.model, "whisper-base");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nbind_addr = ").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.server.bind_addr = "0.0.0.0:9000".into();
        cfg.llm.provider = LlmProvider::OpenAiCompatible;
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.model = "gpt-4o-mini".into();
        cfg.llm.timeout_secs = Some(30);
        cfg.stt.language = "en".into();
        cfg.stt.n_threads = Some(2);

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(loaded.llm.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.llm.model, "gpt-4o-mini");
        assert_eq!(loaded.llm.timeout_secs, Some(30));
        assert_eq!(loaded.stt.language, "en");
        assert_eq!(loaded.stt.n_threads, Some(2));
    }

    #[test]
    fn socket_addr_parses_default_and_rejects_garbage() {
        let mut server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().port(), 8501);

        server.bind_addr = "not an address".into();
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn configured_api_key_wins_over_environment() {
        let cfg = LlmConfig {
            api_key: Some("from-config".into()),
            ..LlmConfig::default()
        };
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn max_upload_bytes_is_megabytes() {
        let server = ServerConfig {
            max_upload_mb: 2,
            ..ServerConfig::default()
        };
        assert_eq!(server.max_upload_bytes(), 2 * 1024 * 1024);
    }
}
