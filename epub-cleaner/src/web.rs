//! HTTP surface: `GET /` serves the upload form, `POST /` cleans the uploaded files.
//!
//! Bodies larger than the configured limit are refused with 413 before any
//! processing: a declared `Content-Length` is checked up front and streamed
//! bodies are cut off by the same layer.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use epub_cleaner_core::clean::clean_batch;
use epub_cleaner_core::config::CleanerConfig;
use epub_cleaner_core::contract::{ArtifactStore, CleanRequest, UploadedFile};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

use crate::render;

pub const NO_FILES_MESSAGE: &str = "No files uploaded";

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CleanerConfig>,
    pub store: Arc<dyn ArtifactStore>,
}

impl AppState {
    pub fn new(config: CleanerConfig, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let limit = state.config.max_upload_bytes();
    Router::new()
        .route("/", get(upload_form).post(upload_files))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limit))
        .with_state(state)
}

fn page(rendered: Result<String, tera::Error>) -> Response {
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = ?e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

async fn upload_form(State(state): State<AppState>) -> Response {
    page(render::upload_page(state.config.max_upload_mb))
}

/// Collect the multipart fields into a [`CleanRequest`], keeping field order.
async fn read_request(multipart: &mut Multipart) -> Result<CleanRequest, MultipartError> {
    let mut request = CleanRequest::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("files") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?.to_vec();
                request.files.push(UploadedFile { filename, content });
            }
            Some("strings") => request.strings.push(field.text().await?),
            Some("process_filename") => request.process_filename = true,
            other => warn!(field = ?other, "Ignoring unexpected form field"),
        }
    }
    Ok(request)
}

async fn upload_files(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(rejection = %rejection, "POST without a multipart body");
            return (StatusCode::BAD_REQUEST, NO_FILES_MESSAGE).into_response();
        }
    };

    let request = match read_request(&mut multipart).await {
        Ok(request) => request,
        Err(e) => {
            warn!(status = %e.status(), error = %e.body_text(), "Failed to read multipart body");
            return (e.status(), e.body_text()).into_response();
        }
    };

    if request.files.first().map_or(true, |f| f.filename.is_empty()) {
        return (StatusCode::BAD_REQUEST, NO_FILES_MESSAGE).into_response();
    }

    info!(
        files = request.files.len(),
        strings = request.strings.len(),
        process_filename = request.process_filename,
        "Received clean request"
    );
    match clean_batch(&state.config, state.store.as_ref(), request).await {
        Ok(report) => page(render::result_page(&report, state.config.max_upload_mb)),
        Err(e) => {
            error!(error = %e, "Clean request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process uploaded files").into_response()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = ?e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {addr}: {e}"))?;
    info!(%addr, "Listening for uploads");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;
    Ok(())
}
