use crate::application::error::ApplicationError;
use crate::application::form_params::FormParams;
use crate::application::shrink_service::{ShrinkOutcome, ShrinkService, ShrunkArchive, ShrunkImage};
use crate::application::upload::UploadedFile;
use super::config::EncodeDefaults;
use super::error::InfrastructureError;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const QUALITY_HEADER: &str = "x-pixelshrink-quality";
pub const MET_TARGET_HEADER: &str = "x-pixelshrink-met-target";
pub const SKIPPED_HEADER: &str = "x-pixelshrink-skipped";

const INDEX_HTML: &str = include_str!("../../../static/index.html");

pub struct AppState {
    pub shrink_service: Arc<ShrinkService>,
    pub encode_defaults: EncodeDefaults,
}

pub fn create_router(state: Arc<AppState>, max_content_length: usize) -> Router {
    Router::new()
        .route("/", get(index_handler).post(shrink_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_content_length))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(vec![header::CONTENT_TYPE])
                .expose_headers(vec![
                    header::CONTENT_DISPOSITION,
                    header::HeaderName::from_static(QUALITY_HEADER),
                    header::HeaderName::from_static(MET_TARGET_HEADER),
                    header::HeaderName::from_static(SKIPPED_HEADER),
                ]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn shrink_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApplicationError> {
    let mut files = Vec::new();
    let mut params = FormParams::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(multipart_error)?;
            files.push(UploadedFile::new(file_name, data.to_vec()));
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            if !params.set(&name, value) {
                debug!(field = %name, "ignoring unknown form field");
            }
        }
    }

    let request = params.into_request(&state.encode_defaults)?;
    // アップロードされたデータはここで消費され、リクエスト終了時に破棄される
    match state.shrink_service.shrink(files, request).await? {
        ShrinkOutcome::Single(image) => single_response(image),
        ShrinkOutcome::Archive(archive) => archive_response(archive),
    }
}

fn single_response(image: ShrunkImage) -> Result<Response, ApplicationError> {
    let response = Response::builder()
        .header(header::CONTENT_TYPE, image.content_type)
        .header(header::CONTENT_DISPOSITION, attachment(&image.download_name))
        .header(QUALITY_HEADER, image.quality.to_string())
        .header(MET_TARGET_HEADER, image.met_target.to_string())
        .body(Body::from(image.bytes))
        .map_err(response_error)?;
    Ok(response.into_response())
}

fn archive_response(archive: ShrunkArchive) -> Result<Response, ApplicationError> {
    let qualities: Vec<String> = archive
        .entries
        .iter()
        .map(|e| format!("{}={}", e.entry_name, e.quality))
        .collect();
    let all_met = archive.entries.iter().all(|e| e.met_target);
    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, "application/zip")
        .header(header::CONTENT_DISPOSITION, attachment(archive.download_name))
        .header(QUALITY_HEADER, qualities.join(","))
        .header(MET_TARGET_HEADER, all_met.to_string());
    if !archive.skipped.is_empty() {
        let names: Vec<&str> = archive.skipped.iter().map(|s| s.file_name.as_str()).collect();
        builder = builder.header(SKIPPED_HEADER, names.join(","));
    }
    let response = builder.body(Body::from(archive.bytes)).map_err(response_error)?;
    Ok(response.into_response())
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApplicationError {
    // DefaultBodyLimit の超過は 413 として返す
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        InfrastructureError::PayloadTooLarge(e.body_text()).into()
    } else {
        InfrastructureError::MultipartError(e.to_string()).into()
    }
}

fn response_error(e: axum::http::Error) -> ApplicationError {
    InfrastructureError::ResponseBuildError(e.to_string()).into()
}
