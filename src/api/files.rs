//! File upload, deletion and resize endpoints

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::{headers::ContentType, TypedHeader};

use crate::{
    error::AppResult,
    models::file::{
        DeleteFileRequest, DeletedFile, ResizeRequest, ResizedImage, StoredFile, StoredImage,
        UploadQuery,
    },
    AppState,
};

use super::{ApiResponse, AppJson};

/// Upload a raw file
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "File stored", body = StoredFile),
        (status = 400, description = "Empty or undecodable body", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    content_type: Option<TypedHeader<ContentType>>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ApiResponse<StoredFile>>)> {
    let content_type = content_type.map(|TypedHeader(ct)| ct.to_string());
    let stored = state
        .services
        .files
        .upload(body, content_type.as_deref(), query.base64)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(stored).with_message("File uploaded")),
    ))
}

/// Upload an image
#[utoipa::path(
    post,
    path = "/images",
    tag = "files",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "image/jpeg"),
    responses(
        (status = 201, description = "Image stored", body = StoredImage),
        (status = 400, description = "Empty or undecodable body", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    content_type: Option<TypedHeader<ContentType>>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ApiResponse<StoredImage>>)> {
    let content_type = content_type.map(|TypedHeader(ct)| ct.to_string());
    let stored = state
        .services
        .files
        .upload_image(body, content_type.as_deref(), query.base64)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(stored).with_message("Image uploaded")),
    ))
}

/// Delete a file named in the JSON body (`{"fileName": ...}`) or the query string
#[utoipa::path(
    delete,
    path = "/files",
    tag = "files",
    params(DeleteFileRequest),
    request_body(content = DeleteFileRequest, description = "Optional, takes precedence over the query"),
    responses(
        (status = 200, description = "File deleted", body = DeletedFile),
        (status = 400, description = "fileName missing", body = crate::error::ErrorResponse),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Query(query): Query<DeleteFileRequest>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<DeletedFile>>> {
    let from_body = if body.is_empty() {
        None
    } else {
        // A body that is not JSON is taken as the file name itself
        match serde_json::from_slice::<DeleteFileRequest>(&body) {
            Ok(request) => request.file_name,
            Err(_) => Some(String::from_utf8_lossy(&body).trim().to_string()),
        }
    };
    let file_name = from_body.or(query.file_name);
    let deleted = state.services.files.delete(file_name.as_deref()).await?;
    Ok(Json(ApiResponse::data(deleted).with_message("File deleted")))
}

/// Delete a file named in the path
#[utoipa::path(
    delete,
    path = "/files/{file_name}",
    tag = "files",
    params(("file_name" = String, Path, description = "Object key")),
    responses(
        (status = 200, description = "File deleted", body = DeletedFile),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_file_by_path(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<Json<ApiResponse<DeletedFile>>> {
    let deleted = state.services.files.delete(Some(file_name.as_str())).await?;
    Ok(Json(ApiResponse::data(deleted).with_message("File deleted")))
}

/// Store an image under a resized name. The pixels are not modified.
#[utoipa::path(
    post,
    path = "/resize",
    tag = "files",
    request_body = ResizeRequest,
    responses(
        (status = 201, description = "Image processed", body = ResizedImage),
        (status = 400, description = "imageData missing or not base64", body = crate::error::ErrorResponse)
    )
)]
pub async fn resize_image(
    State(state): State<AppState>,
    AppJson(request): AppJson<ResizeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ResizedImage>>)> {
    let resized = state.services.files.resize(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(resized).with_message("Image processed")),
    ))
}
