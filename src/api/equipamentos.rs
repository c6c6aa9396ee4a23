//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{BulkUpdateResponse, EquipamentoPage, ManutencaoPage, PaginatedResponse};
use crate::{
    display::{EquipamentoRow, ManutencaoRow},
    error::AppResult,
    models::{
        equipamento::{EquipamentoAtivoUpdate, EquipamentoInput, EquipamentoQuery},
        manutencao::ManutencaoQuery,
        Equipamento, PortaSwitch,
    },
    AppState,
};

/// List equipment ordered by site, type and name
#[utoipa::path(
    get,
    path = "/equipamentos",
    tag = "equipamentos",
    params(EquipamentoQuery),
    responses(
        (status = 200, description = "Equipment", body = EquipamentoPage)
    )
)]
pub async fn list_equipamentos(
    State(state): State<AppState>,
    Query(query): Query<EquipamentoQuery>,
) -> AppResult<Json<PaginatedResponse<EquipamentoRow>>> {
    let (rows, total) = state.services.equipamentos.list(&query).await?;
    Ok(Json(PaginatedResponse::new(rows, total, query.page, query.per_page)))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipamentos/{id}",
    tag = "equipamentos",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment", body = EquipamentoRow),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipamento(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipamentoRow>> {
    Ok(Json(state.services.equipamentos.get_by_id(id).await?))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipamentos",
    tag = "equipamentos",
    request_body = EquipamentoInput,
    responses(
        (status = 201, description = "Equipment created", body = Equipamento),
        (status = 400, description = "Invalid field", body = crate::error::ErrorResponse),
        (status = 409, description = "Unknown site", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipamento(
    State(state): State<AppState>,
    Json(data): Json<EquipamentoInput>,
) -> AppResult<(StatusCode, Json<Equipamento>)> {
    let equipamento = state.services.equipamentos.create(data).await?;
    Ok((StatusCode::CREATED, Json(equipamento)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipamentos/{id}",
    tag = "equipamentos",
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = EquipamentoInput,
    responses(
        (status = 200, description = "Equipment updated", body = Equipamento),
        (status = 400, description = "Invalid field", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipamento(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<EquipamentoInput>,
) -> AppResult<Json<Equipamento>> {
    Ok(Json(state.services.equipamentos.update(id, data).await?))
}

/// Delete equipment along with its ports and maintenance records
#[utoipa::path(
    delete,
    path = "/equipamentos/{id}",
    tag = "equipamentos",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_equipamento(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.equipamentos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk edit of the active flag
#[utoipa::path(
    patch,
    path = "/equipamentos/ativo",
    tag = "equipamentos",
    request_body = Vec<EquipamentoAtivoUpdate>,
    responses(
        (status = 200, description = "Rows updated", body = BulkUpdateResponse),
        (status = 404, description = "Unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn bulk_set_ativo(
    State(state): State<AppState>,
    Json(updates): Json<Vec<EquipamentoAtivoUpdate>>,
) -> AppResult<Json<BulkUpdateResponse>> {
    let updated = state.services.equipamentos.set_ativo(&updates).await?;
    Ok(Json(BulkUpdateResponse { updated }))
}

/// Ports of an equipment (inline view)
#[utoipa::path(
    get,
    path = "/equipamentos/{id}/portas",
    tag = "equipamentos",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Ports ordered by number", body = Vec<PortaSwitch>),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_portas(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<PortaSwitch>>> {
    Ok(Json(state.services.equipamentos.portas(id).await?))
}

/// Maintenance history of an equipment
#[utoipa::path(
    get,
    path = "/equipamentos/{id}/manutencoes",
    tag = "equipamentos",
    params(("id" = i32, Path, description = "Equipment ID"), ManutencaoQuery),
    responses(
        (status = 200, description = "Maintenance, most recent first", body = ManutencaoPage),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_manutencoes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ManutencaoQuery>,
) -> AppResult<Json<PaginatedResponse<ManutencaoRow>>> {
    let (page, per_page) = (query.page, query.per_page);
    let (rows, total) = state.services.equipamentos.manutencoes(id, query).await?;
    Ok(Json(PaginatedResponse::new(rows, total, page, per_page)))
}
