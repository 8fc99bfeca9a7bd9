//! Application entry point: Note-fy.
//!
//! # Startup sequence
//!
//! 1. Parse the command line.
//! 2. Initialise logging.
//! 3. Load [`AppConfig`] from disk (defaults when the file is absent).
//! 4. Load the Whisper model, or fall back to an engine that reports the
//!    missing model on every audio request.
//! 5. Build the note generator ([`ApiGenerator`]) from config.
//! 6. Create the tokio runtime and either serve the web page or process a
//!    single file from the terminal.
//!
//! `init-config` stops after step 3 and writes the settings file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use notefy::{
    config::{AppConfig, AppPaths},
    extract::UploadedFile,
    llm::{ApiGenerator, NoteGenerator, NoteStyle},
    pipeline::NotesPipeline,
    stt::{ModelPaths, SttEngine, SttError, TranscribeParams, TranscriptionResult, WhisperEngine},
    web,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "notefy", version, about = "Generate study notes from a PDF or MP3")]
struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the web page (default).
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:8501.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate notes for one file and print them.
    Notes {
        file: PathBuf,
        /// short, detailed, qa or colour.
        #[arg(long, default_value = "short")]
        style: NoteStyle,
    },
    /// Write the active settings to the settings file and print its path.
    InitConfig,
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Note-fy starting up");

    // 2. Configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e:#}); using defaults");
            AppConfig::default()
        }),
    };

    if let Some(Command::InitConfig) = cli.command {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| AppPaths::new().settings_file);
        config.save_to(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    // 3. Collaborators
    let stt = build_stt(&config);
    let generator: Arc<dyn NoteGenerator> = Arc::new(ApiGenerator::from_config(&config.llm));
    if config.llm.resolved_api_key().is_none() {
        log::warn!(
            "No API key configured; set llm.api_key or {}",
            config.llm.provider.api_key_env()
        );
    }
    let pipeline = NotesPipeline::new(stt, generator);

    // 4. Runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            rt.block_on(web::serve(&config.server, pipeline))
        }
        Command::Notes { file, style } => {
            let upload = read_upload(&file)?;
            let notes = rt.block_on(pipeline.process(&upload, style));
            println!("{notes}");
            Ok(())
        }
        Command::InitConfig => Ok(()),
    }
}

fn build_stt(config: &AppConfig) -> Arc<dyn SttEngine> {
    let model_path = ModelPaths::from_app_paths(&AppPaths::new()).resolve(&config.stt.model);
    let params = TranscribeParams::from_config(&config.stt);

    match WhisperEngine::load(&model_path, params) {
        Ok(engine) => {
            log::info!("Whisper model loaded: {}", model_path.display());
            Arc::new(engine)
        }
        Err(e) => {
            log::warn!(
                "Could not load Whisper model ({}): {e}. Audio uploads will fail.",
                model_path.display()
            );
            Arc::new(NoModelStt {
                path: model_path.display().to_string(),
            })
        }
    }
}

fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedFile::new(bytes, filename, ""))
}

// ---------------------------------------------------------------------------
// NoModelStt: fallback SttEngine when the model file is not present
// ---------------------------------------------------------------------------

struct NoModelStt {
    path: String,
}

impl SttEngine for NoModelStt {
    fn transcribe(&self, _audio_path: &Path) -> Result<TranscriptionResult, SttError> {
        Err(SttError::ModelNotFound(self.path.clone()))
    }
}
