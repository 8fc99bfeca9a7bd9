//! Note-fy: upload a PDF or an MP3 and get study notes in one of four styles.
//!
//! ```text
//! upload ──▶ extract ──▶ llm::prompt ──▶ llm::generator ──▶ web page
//!            (pdf | audio → stt)
//! ```

pub mod audio;
pub mod config;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod stt;
pub mod web;
