//! Sites API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{LocalizacaoPage, PaginatedResponse};
use crate::{
    display::LocalizacaoRow,
    error::AppResult,
    models::{
        localizacao::{LocalizacaoInput, LocalizacaoQuery},
        Localizacao,
    },
    AppState,
};

/// List sites with equipment counts
#[utoipa::path(
    get,
    path = "/localizacoes",
    tag = "localizacoes",
    params(LocalizacaoQuery),
    responses(
        (status = 200, description = "Sites", body = LocalizacaoPage)
    )
)]
pub async fn list_localizacoes(
    State(state): State<AppState>,
    Query(query): Query<LocalizacaoQuery>,
) -> AppResult<Json<PaginatedResponse<LocalizacaoRow>>> {
    let (rows, total) = state.services.localizacoes.list(&query).await?;
    Ok(Json(PaginatedResponse::new(rows, total, query.page, query.per_page)))
}

/// Get a site by ID
#[utoipa::path(
    get,
    path = "/localizacoes/{id}",
    tag = "localizacoes",
    params(("id" = i32, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Site", body = LocalizacaoRow),
        (status = 404, description = "Site not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_localizacao(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LocalizacaoRow>> {
    Ok(Json(state.services.localizacoes.get_by_id(id).await?))
}

/// Create a site
#[utoipa::path(
    post,
    path = "/localizacoes",
    tag = "localizacoes",
    request_body = LocalizacaoInput,
    responses(
        (status = 201, description = "Site created", body = Localizacao),
        (status = 400, description = "Invalid field", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_localizacao(
    State(state): State<AppState>,
    Json(data): Json<LocalizacaoInput>,
) -> AppResult<(StatusCode, Json<Localizacao>)> {
    let site = state.services.localizacoes.create(data).await?;
    Ok((StatusCode::CREATED, Json(site)))
}

/// Update a site
#[utoipa::path(
    put,
    path = "/localizacoes/{id}",
    tag = "localizacoes",
    params(("id" = i32, Path, description = "Site ID")),
    request_body = LocalizacaoInput,
    responses(
        (status = 200, description = "Site updated", body = Localizacao),
        (status = 404, description = "Site not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_localizacao(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<LocalizacaoInput>,
) -> AppResult<Json<Localizacao>> {
    Ok(Json(state.services.localizacoes.update(id, data).await?))
}

/// Delete a site (its equipment is kept with no site)
#[utoipa::path(
    delete,
    path = "/localizacoes/{id}",
    tag = "localizacoes",
    params(("id" = i32, Path, description = "Site ID")),
    responses(
        (status = 204, description = "Site deleted"),
        (status = 404, description = "Site not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_localizacao(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.localizacoes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
