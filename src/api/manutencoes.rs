//! Maintenance API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{ManutencaoPage, PaginatedResponse};
use crate::{
    display::ManutencaoRow,
    error::AppResult,
    models::{
        manutencao::{ManutencaoInput, ManutencaoQuery},
        Manutencao,
    },
    AppState,
};

/// List maintenance records, most recent first
///
/// `ano`, `mes` and `dia` drill down on the start date.
#[utoipa::path(
    get,
    path = "/manutencoes",
    tag = "manutencoes",
    params(ManutencaoQuery),
    responses(
        (status = 200, description = "Maintenance records", body = ManutencaoPage)
    )
)]
pub async fn list_manutencoes(
    State(state): State<AppState>,
    Query(query): Query<ManutencaoQuery>,
) -> AppResult<Json<PaginatedResponse<ManutencaoRow>>> {
    let (rows, total) = state.services.manutencoes.list(&query).await?;
    Ok(Json(PaginatedResponse::new(rows, total, query.page, query.per_page)))
}

/// Get a maintenance record by ID
#[utoipa::path(
    get,
    path = "/manutencoes/{id}",
    tag = "manutencoes",
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Maintenance record", body = ManutencaoRow),
        (status = 404, description = "Maintenance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_manutencao(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ManutencaoRow>> {
    Ok(Json(state.services.manutencoes.get_by_id(id).await?))
}

/// Record a maintenance
#[utoipa::path(
    post,
    path = "/manutencoes",
    tag = "manutencoes",
    request_body = ManutencaoInput,
    responses(
        (status = 201, description = "Maintenance recorded", body = Manutencao),
        (status = 400, description = "Invalid field", body = crate::error::ErrorResponse),
        (status = 409, description = "Unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_manutencao(
    State(state): State<AppState>,
    Json(data): Json<ManutencaoInput>,
) -> AppResult<(StatusCode, Json<Manutencao>)> {
    let manutencao = state.services.manutencoes.create(data).await?;
    Ok((StatusCode::CREATED, Json(manutencao)))
}

/// Update a maintenance record
#[utoipa::path(
    put,
    path = "/manutencoes/{id}",
    tag = "manutencoes",
    params(("id" = i32, Path, description = "Maintenance ID")),
    request_body = ManutencaoInput,
    responses(
        (status = 200, description = "Maintenance updated", body = Manutencao),
        (status = 404, description = "Maintenance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_manutencao(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<ManutencaoInput>,
) -> AppResult<Json<Manutencao>> {
    Ok(Json(state.services.manutencoes.update(id, data).await?))
}

/// Delete a maintenance record
#[utoipa::path(
    delete,
    path = "/manutencoes/{id}",
    tag = "manutencoes",
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 204, description = "Maintenance deleted"),
        (status = 404, description = "Maintenance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_manutencao(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.manutencoes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
