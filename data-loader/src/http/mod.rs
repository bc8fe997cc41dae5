//! HTTP upload endpoint: `POST /downloader/add_data_from_file` (multipart field `file`).

mod error;
mod sniff;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use ya_disk::{UploadPipeline, UploadSource};

pub use error::ApiError;
pub use sniff::{detect, is_spreadsheet};

pub const UPLOAD_ROUTE: &str = "/downloader/add_data_from_file";
pub const UPLOAD_FIELD: &str = "file";
pub const OK_MESSAGE: &str = "The data has been successfully added to the processing queue, and the results will be sent in a telegram.";
const DEFAULT_FILE_NAME: &str = "document.xlsx";
/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct HttpState {
    pub pipeline: Arc<UploadPipeline>,
    pub max_file_size: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    pub status: String,
    pub message: String,
}

impl Default for OkResponse {
    fn default() -> Self {
        Self {
            status: "Ok".to_string(),
            message: OK_MESSAGE.to_string(),
        }
    }
}

pub fn router(state: HttpState) -> Router {
    let body_limit = state.max_file_size.saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route(UPLOAD_ROUTE, post(add_data_from_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Binds `addr` and serves until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: HttpState, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "HTTP upload endpoint listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP upload endpoint stopped");
    Ok(())
}

#[instrument(name = "http.upload", skip_all)]
async fn add_data_from_file(
    State(state): State<HttpState>,
    mut multipart: Multipart,
) -> Result<Json<OkResponse>, ApiError> {
    let max = state.max_file_size;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, max))?;
        upload = Some((name, bytes));
        break;
    }

    let Some((name, bytes)) = upload else {
        return Err(ApiError::Validation(format!(
            "Field `{UPLOAD_FIELD}` is required"
        )));
    };
    if bytes.len() > max {
        return Err(ApiError::too_large(max));
    }
    match detect(&bytes) {
        Some(ext) if is_spreadsheet(ext) => {}
        Some(ext) => {
            return Err(ApiError::Validation(format!(
                "Invalid file type: {ext}. The `xls` or `xlsx` type is expected."
            )))
        }
        None => return Err(ApiError::Validation("Unknown file type".to_string())),
    }

    let size = bytes.len();
    let path = state
        .pipeline
        .upload(&UploadSource::Buffer(bytes), &name)
        .await?;
    info!(file = %name, path = %path, size, "File accepted over HTTP");
    Ok(Json(OkResponse::default()))
}

fn multipart_error(e: MultipartError, max: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::too_large(max)
    } else {
        ApiError::Validation(e.body_text())
    }
}
