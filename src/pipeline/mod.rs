//! Pipeline module for Note-fy.
//!
//! Wires extraction, prompt composition and generation into one call.
//!
//! # Architecture
//!
//! ```text
//! POST /notes ──▶ NotesPipeline::process(upload, style)
//!                        │
//!                        ├─ FileKind::detect          → unsupported message
//!                        ├─ spawn_blocking(Extractor)  → PDF text | transcript
//!                        ├─ NoteStyle::prompt_for
//!                        └─ NoteGenerator::generate    → notes
//!                        │
//!                        ▼
//!                String (notes or error message)
//! ```

pub mod runner;

pub use runner::{NotesError, NotesPipeline};
