//! Material endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::material::{CreateMaterial, Material, UpdateMaterial},
    AppState,
};

use super::{ApiResponse, AppJson};

/// List all materials
#[utoipa::path(
    get,
    path = "/materials",
    tag = "materials",
    responses(
        (status = 200, description = "Materials in `data`, their number in `count`", body = [Material])
    )
)]
pub async fn list_materials(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Material>>>> {
    let materials = state.services.materials.list().await?;
    Ok(Json(ApiResponse::list(materials)))
}

/// Get material by ID
#[utoipa::path(
    get,
    path = "/materials/{id}",
    tag = "materials",
    params(("id" = String, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Material in `data`", body = Material),
        (status = 404, description = "Material not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let material = state.services.materials.get_by_id(&id).await?;
    Ok(Json(ApiResponse::data(material)))
}

/// Create a material
#[utoipa::path(
    post,
    path = "/materials",
    tag = "materials",
    request_body = CreateMaterial,
    responses(
        (status = 201, description = "Material created", body = Material),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_material(
    State(state): State<AppState>,
    AppJson(data): AppJson<CreateMaterial>,
) -> AppResult<(StatusCode, Json<ApiResponse<Material>>)> {
    let material = state.services.materials.create(data).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(material))))
}

/// Update a material (partial)
#[utoipa::path(
    put,
    path = "/materials/{id}",
    tag = "materials",
    params(("id" = String, Path, description = "Material ID")),
    request_body = UpdateMaterial,
    responses(
        (status = 200, description = "Material updated", body = Material),
        (status = 404, description = "Material not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(data): AppJson<UpdateMaterial>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let material = state.services.materials.update(&id, &data).await?;
    Ok(Json(
        ApiResponse::data(material).with_message("Material updated"),
    ))
}

/// Delete a material
#[utoipa::path(
    delete,
    path = "/materials/{id}",
    tag = "materials",
    params(("id" = String, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Material deleted"),
        (status = 404, description = "Material not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.materials.delete(&id).await?;
    Ok(Json(ApiResponse::message("Material deleted")))
}

/// Recompute the loaned quantity from the loans referencing the material
#[utoipa::path(
    post,
    path = "/materials/{id}/reconcile",
    tag = "materials",
    params(("id" = String, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Loaned quantity recomputed", body = Material),
        (status = 404, description = "Material not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn reconcile_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let material = state.services.loans.reconcile(&id).await?;
    let message = format!(
        "Loaned quantity recomputed: {} unit(s) on loan",
        material.loaned_quantity
    );
    Ok(Json(ApiResponse::data(material).with_message(message)))
}
