use axum::extract::{Multipart, State, multipart::MultipartRejection};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::UploadResponse,
    response::{ApiResponse, ApiResult},
};

/// Multipart form field that carries the file.
pub const UPLOAD_FIELD: &str = "file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// object_key
///
/// `uploads/<uuid>[.<ext>]`. Only a short alphanumeric extension survives from the
/// client's filename, so nothing the client sends can shape the rest of the key.
pub fn object_key(file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match extension {
        Some(ext) => format!("uploads/{}.{}", Uuid::new_v4(), ext),
        None => format!("uploads/{}", Uuid::new_v4()),
    }
}

/// upload_file
///
/// [Authenticated Route] Streams the `file` field of a multipart form to object
/// storage and returns where it landed. Other fields are ignored.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Form with a `file` field"),
    responses(
        (status = 200, description = "Stored", body = ApiResponse<UploadResponse>),
        (status = 500, description = "No file field, or storage failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_file(
    user: AuthUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadResponse> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let key = object_key(field.file_name());
        let content_type = field.content_type().unwrap_or(DEFAULT_CONTENT_TYPE).to_string();
        let body = field.bytes().await?;

        let url = state.storage.upload(&key, &content_type, body.to_vec()).await?;
        tracing::info!(user_id = user.id, key = %key, size = body.len(), "file uploaded");

        return Ok(ApiResponse::ok(UploadResponse { url, key }));
    }

    Err(ApiError::MissingFile)
}
