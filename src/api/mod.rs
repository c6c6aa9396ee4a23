//! API handlers for the Rede inventory REST endpoints

pub mod equipamentos;
pub mod health;
pub mod localizacoes;
pub mod lookup;
pub mod manutencoes;
pub mod openapi;
pub mod portas;

use axum::{
    routing::{get, patch},
    Router,
};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    display::{EquipamentoRow, LocalizacaoRow, ManutencaoRow, PortaRow},
    models::pagination,
    AppState,
};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(
    LocalizacaoPage = PaginatedResponse<LocalizacaoRow>,
    EquipamentoPage = PaginatedResponse<EquipamentoRow>,
    PortaPage = PaginatedResponse<PortaRow>,
    ManutencaoPage = PaginatedResponse<ManutencaoRow>
)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows of the requested page
    pub items: Vec<T>,
    /// Total number of matching rows
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, page: Option<i64>, per_page: Option<i64>) -> Self {
        let (limit, _) = pagination(page, per_page);
        Self {
            items,
            total,
            page: page.unwrap_or(1).max(1),
            per_page: limit,
        }
    }
}

/// Result of a bulk edit
#[derive(Serialize, ToSchema)]
pub struct BulkUpdateResponse {
    pub updated: u64,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Sites
        .route(
            "/localizacoes",
            get(localizacoes::list_localizacoes).post(localizacoes::create_localizacao),
        )
        .route(
            "/localizacoes/:id",
            get(localizacoes::get_localizacao)
                .put(localizacoes::update_localizacao)
                .delete(localizacoes::delete_localizacao),
        )
        // Equipment
        .route(
            "/equipamentos",
            get(equipamentos::list_equipamentos).post(equipamentos::create_equipamento),
        )
        .route("/equipamentos/ativo", patch(equipamentos::bulk_set_ativo))
        .route(
            "/equipamentos/:id",
            get(equipamentos::get_equipamento)
                .put(equipamentos::update_equipamento)
                .delete(equipamentos::delete_equipamento),
        )
        .route("/equipamentos/:id/portas", get(equipamentos::list_portas))
        .route("/equipamentos/:id/manutencoes", get(equipamentos::list_manutencoes))
        // Ports
        .route(
            "/portas",
            get(portas::list_portas)
                .post(portas::create_porta)
                .patch(portas::bulk_update_portas),
        )
        .route("/portas/filtros", get(portas::list_filtros))
        .route(
            "/portas/:id",
            get(portas::get_porta)
                .put(portas::update_porta)
                .delete(portas::delete_porta),
        )
        // Maintenance
        .route(
            "/manutencoes",
            get(manutencoes::list_manutencoes).post(manutencoes::create_manutencao),
        )
        .route(
            "/manutencoes/:id",
            get(manutencoes::get_manutencao)
                .put(manutencoes::update_manutencao)
                .delete(manutencoes::delete_manutencao),
        )
        .with_state(state.clone());

    // The admin forms call the lookup outside the versioned API
    let rede = Router::new()
        .route("/portas-por-equipamento/", get(lookup::portas_por_equipamento))
        .route("/portas-por-equipamento", get(lookup::portas_por_equipamento))
        .layer(CatchPanicLayer::custom(lookup::panic_response))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .nest("/rede", rede)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
