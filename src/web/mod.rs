//! HTTP front end.
//!
//! ```text
//! GET  /        → empty page
//! POST /notes   → multipart { file, style } → NotesPipeline::process → page
//! GET  /health  → "ok"
//! ```
//!
//! Request bodies are capped with [`DefaultBodyLimit`] at
//! `server.max_upload_mb`.  Each submission is handled to completion before
//! its response is sent; concurrent submissions share only the pipeline.

pub mod page;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::config::ServerConfig;
use crate::extract::UploadedFile;
use crate::llm::NoteStyle;
use crate::pipeline::NotesPipeline;

pub use page::{render, PageView, ResultView, BUSY_TEXT, NO_FILE_NOTICE};

/// Build the application router.
pub fn router(pipeline: NotesPipeline, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/notes", post(submit))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(pipeline)
}

/// Bind `config.bind_addr` and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, pipeline: NotesPipeline) -> anyhow::Result<()> {
    use anyhow::Context;

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;

    log::info!("web: listening on http://{addr}");
    axum::serve(listener, router(pipeline, config.max_upload_bytes()))
        .await
        .context("server error")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<String> {
    Html(render(&PageView::empty(NoteStyle::default())))
}

async fn submit(State(pipeline): State<NotesPipeline>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let style = match form.style.as_deref() {
        None => NoteStyle::default(),
        Some(raw) => match raw.parse::<NoteStyle>() {
            Ok(style) => style,
            Err(e) => {
                log::warn!("web: {e}");
                return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
            }
        },
    };

    let Some(upload) = form.file else {
        return Html(render(&PageView::empty(style))).into_response();
    };

    let output = pipeline.process(&upload, style).await;
    let view = PageView::with_result(
        style,
        ResultView {
            filename: &upload.filename,
            file_type: &upload.mime,
            output: &output,
        },
    );
    Html(render(&view)).into_response()
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct NotesForm {
    /// `None` when no file part was sent or the part was empty.
    file: Option<UploadedFile>,
    style: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<NotesForm, Response> {
    let mut form = NotesForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_rejection(e)),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let mime = field.content_type().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(multipart_rejection)?;
                if bytes.is_empty() {
                    log::debug!("web: empty file part {filename:?} ignored");
                    continue;
                }
                form.file = Some(UploadedFile::new(bytes.to_vec(), filename, mime));
            }
            "style" => {
                form.style = Some(field.text().await.map_err(multipart_rejection)?);
            }
            other => {
                log::debug!("web: ignoring form field {other:?}");
            }
        }
    }

    Ok(form)
}

fn multipart_rejection(e: axum::extract::multipart::MultipartError) -> Response {
    log::warn!("web: multipart read failed: {e}");
    (e.status(), e.body_text()).into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
