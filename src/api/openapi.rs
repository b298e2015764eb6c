//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{files, health, loans, materials};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.3.0",
        description = "Materials, loans and file storage REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Materials
        materials::list_materials,
        materials::get_material,
        materials::create_material,
        materials::update_material,
        materials::delete_material,
        materials::reconcile_material,
        // Loans
        loans::list_loans,
        loans::get_loan,
        loans::create_loan,
        loans::update_loan,
        loans::delete_loan,
        // Files
        files::upload_file,
        files::upload_image,
        files::delete_file,
        files::delete_file_by_path,
        files::resize_image,
    ),
    components(
        schemas(
            // Materials
            crate::models::material::Material,
            crate::models::material::CreateMaterial,
            crate::models::material::UpdateMaterial,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::CreateLoan,
            crate::models::loan::UpdateLoan,
            // Files
            crate::models::file::StoredFile,
            crate::models::file::StoredImage,
            crate::models::file::DeletedFile,
            crate::models::file::DeleteFileRequest,
            crate::models::file::ResizeRequest,
            crate::models::file::ResizedImage,
            crate::models::file::Dimensions,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "materials", description = "Material inventory"),
        (name = "loans", description = "Loans of materials"),
        (name = "files", description = "Uploaded files and images")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
