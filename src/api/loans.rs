//! Loan management endpoints
//!
//! Loan writes report the effect on the material counter in `message`. A
//! failed adjustment does not turn the response into an error: the loan
//! itself was written.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanChange, UpdateLoan},
    AppState,
};

use super::{ApiResponse, AppJson};

fn change_message(action: &str, change: &LoanChange) -> String {
    match change.adjustment.describe() {
        Some(detail) => format!("Loan {}; {}", action, detail),
        None => format!("Loan {}", action),
    }
}

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "Loans in `data`, their number in `count`", body = [Loan])
    )
)]
pub async fn list_loans(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Loan>>>> {
    let loans = state.services.loans.list().await?;
    Ok(Json(ApiResponse::list(loans)))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = String, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan in `data`", body = Loan),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    let loan = state.services.loans.get_by_id(&id).await?;
    Ok(Json(ApiResponse::data(loan)))
}

/// Create a loan and add its quantity to the material's loaned quantity
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    AppJson(data): AppJson<CreateLoan>,
) -> AppResult<(StatusCode, Json<ApiResponse<Loan>>)> {
    let change = state.services.loans.create(data).await?;
    let message = change_message("created", &change);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(change.loan).with_message(message)),
    ))
}

/// Update a loan (partial)
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = String, Path, description = "Loan ID")),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = Loan),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(data): AppJson<UpdateLoan>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    let change = state.services.loans.update(&id, &data).await?;
    let message = change_message("updated", &change);
    Ok(Json(ApiResponse::data(change.loan).with_message(message)))
}

/// Delete a loan and release its quantity
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = String, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan deleted"),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let change = state.services.loans.delete(&id).await?;
    Ok(Json(ApiResponse::message(change_message("deleted", &change))))
}
