//! Ports API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{BulkUpdateResponse, PaginatedResponse, PortaPage};
use crate::{
    display::PortaRow,
    error::AppResult,
    models::{
        porta::{PortaBulkUpdate, PortaInput, PortaQuery},
        PortaSwitch,
    },
    services::filtros::FilterDescription,
    AppState,
};

/// List ports, with the derived connected-equipment filters
#[utoipa::path(
    get,
    path = "/portas",
    tag = "portas",
    params(PortaQuery),
    responses(
        (status = 200, description = "Ports ordered by equipment and number", body = PortaPage)
    )
)]
pub async fn list_portas(
    State(state): State<AppState>,
    Query(query): Query<PortaQuery>,
) -> AppResult<Json<PaginatedResponse<PortaRow>>> {
    let (rows, total) = state.services.portas.list(&query).await?;
    Ok(Json(PaginatedResponse::new(rows, total, query.page, query.per_page)))
}

/// Options of every derived port filter
#[utoipa::path(
    get,
    path = "/portas/filtros",
    tag = "portas",
    responses(
        (status = 200, description = "Registered filters", body = Vec<FilterDescription>)
    )
)]
pub async fn list_filtros(State(state): State<AppState>) -> AppResult<Json<Vec<FilterDescription>>> {
    Ok(Json(state.services.filtros.describe().await?))
}

/// Get a port by ID
#[utoipa::path(
    get,
    path = "/portas/{id}",
    tag = "portas",
    params(("id" = i32, Path, description = "Port ID")),
    responses(
        (status = 200, description = "Port", body = PortaRow),
        (status = 404, description = "Port not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_porta(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PortaRow>> {
    Ok(Json(state.services.portas.get_by_id(id).await?))
}

/// Create a port on a switch or router
#[utoipa::path(
    post,
    path = "/portas",
    tag = "portas",
    request_body = PortaInput,
    responses(
        (status = 201, description = "Port created", body = PortaSwitch),
        (status = 400, description = "Invalid field or owner type", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate number or unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_porta(
    State(state): State<AppState>,
    Json(data): Json<PortaInput>,
) -> AppResult<(StatusCode, Json<PortaSwitch>)> {
    let porta = state.services.portas.create(data).await?;
    Ok((StatusCode::CREATED, Json(porta)))
}

/// Update a port
#[utoipa::path(
    put,
    path = "/portas/{id}",
    tag = "portas",
    params(("id" = i32, Path, description = "Port ID")),
    request_body = PortaInput,
    responses(
        (status = 200, description = "Port updated", body = PortaSwitch),
        (status = 404, description = "Port not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate number", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_porta(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<PortaInput>,
) -> AppResult<Json<PortaSwitch>> {
    Ok(Json(state.services.portas.update(id, data).await?))
}

/// Delete a port
#[utoipa::path(
    delete,
    path = "/portas/{id}",
    tag = "portas",
    params(("id" = i32, Path, description = "Port ID")),
    responses(
        (status = 204, description = "Port deleted"),
        (status = 404, description = "Port not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_porta(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.portas.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk edit of status and VLAN
#[utoipa::path(
    patch,
    path = "/portas",
    tag = "portas",
    request_body = Vec<PortaBulkUpdate>,
    responses(
        (status = 200, description = "Rows updated", body = BulkUpdateResponse),
        (status = 404, description = "Unknown port", body = crate::error::ErrorResponse)
    )
)]
pub async fn bulk_update_portas(
    State(state): State<AppState>,
    Json(updates): Json<Vec<PortaBulkUpdate>>,
) -> AppResult<Json<BulkUpdateResponse>> {
    let updated = state.services.portas.bulk_update(&updates).await?;
    Ok(Json(BulkUpdateResponse { updated }))
}
