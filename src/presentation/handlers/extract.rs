use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Serialize;

use crate::application::ports::{Annotator, FileLoader, UnitSplitter};
use crate::application::services::ExtractionError;
use crate::domain::ContentType;
use crate::infrastructure::observability::RequestId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip_all, fields(request_id = %request_id.0))]
pub async fn extract_handler<F, S, A>(
    State(state): State<AppState<F, S, A>>,
    Extension(request_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
    S: UnitSplitter + 'static + ?Sized,
    A: Annotator + 'static + ?Sized,
{
    // Only the "file" field carries the upload; anything else is ignored.
    let (filename, content_type, data) = loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => {
                tracing::warn!("Extract request without a file field");
                return error_response(StatusCode::BAD_REQUEST, "No file uploaded".to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        if field.name() != Some("file") {
            tracing::debug!(
                field = field.name().unwrap_or("<unnamed>"),
                "Skipping unexpected multipart field"
            );
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            tracing::warn!("Upload without a filename");
            return error_response(StatusCode::BAD_REQUEST, "No filename provided".to_string());
        }
        if !filename.to_lowercase().ends_with(".pdf") {
            tracing::warn!(filename = %filename, "Upload is not a PDF");
            return error_response(StatusCode::BAD_REQUEST, "File must be a PDF".to_string());
        }

        let content_type_str = field.content_type().unwrap_or("application/octet-stream");
        let content_type = match ContentType::from_mime(content_type_str) {
            Some(ct) => ct,
            None => {
                tracing::warn!(content_type = %content_type_str, "Unsupported content type");
                return error_response(
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    format!("Unsupported content type: {}", content_type_str),
                );
            }
        };

        let data = match field.bytes().await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read file bytes");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read file: {}", e),
                );
            }
        };

        break (filename, content_type, data);
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File data received");

    match state
        .extraction_service
        .extract(&data, filename, content_type)
        .await
    {
        Ok(entities) => {
            tracing::info!(entity_count = entities.len(), "Extraction succeeded");
            (StatusCode::OK, Json(entities)).into_response()
        }
        Err(ExtractionError::InvalidInput(message)) => {
            tracing::warn!(error = %message, "Invalid input");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, message)
        }
        Err(ExtractionError::FileLoading(e)) => {
            tracing::warn!(error = %e, "File loading failed");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        Err(ExtractionError::Pipeline(e)) => {
            // Internal detail stays in the logs, not the response.
            tracing::error!(error = %e, "Extraction pipeline failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Entity extraction failed".to_string(),
            )
        }
    }
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}
