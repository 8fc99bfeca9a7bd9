//! Note generation for Note-fy.
//!
//! This module provides:
//! * [`NoteStyle`]: the four fixed note styles and their instruction text.
//! * [`compose`]: joins an instruction with the extracted content.
//! * [`NoteGenerator`]: async trait implemented by generation backends.
//! * [`ApiGenerator`]: hosted Gemini / OpenAI-compatible REST backend.
//! * [`LlmError`]: error variants for generation.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use notefy::config::AppConfig;
//! use notefy::llm::{ApiGenerator, NoteGenerator, NoteStyle};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generator = ApiGenerator::from_config(&config.llm);
//!
//!     let prompt = NoteStyle::QuestionAnswers.prompt_for("The mitochondria is ...");
//!     let notes = generator.generate(&prompt).await.unwrap();
//!     println!("{notes}");
//! }
//! ```

pub mod generator;
pub mod prompt;

pub use generator::{ApiGenerator, LlmError, NoteGenerator};
pub use prompt::{compose, NoteStyle, UnknownStyle};
