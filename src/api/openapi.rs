//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipamentos, health, localizacoes, lookup, manutencoes, portas};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rede Inventory API",
        version = "0.1.0",
        description = "Network inventory: sites, equipment, switch ports and maintenance"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Sites
        localizacoes::list_localizacoes,
        localizacoes::get_localizacao,
        localizacoes::create_localizacao,
        localizacoes::update_localizacao,
        localizacoes::delete_localizacao,
        // Equipment
        equipamentos::list_equipamentos,
        equipamentos::get_equipamento,
        equipamentos::create_equipamento,
        equipamentos::update_equipamento,
        equipamentos::delete_equipamento,
        equipamentos::bulk_set_ativo,
        equipamentos::list_portas,
        equipamentos::list_manutencoes,
        // Ports
        portas::list_portas,
        portas::list_filtros,
        portas::get_porta,
        portas::create_porta,
        portas::update_porta,
        portas::delete_porta,
        portas::bulk_update_portas,
        // Maintenance
        manutencoes::list_manutencoes,
        manutencoes::get_manutencao,
        manutencoes::create_manutencao,
        manutencoes::update_manutencao,
        manutencoes::delete_manutencao,
        // Lookup
        lookup::portas_por_equipamento,
    ),
    components(
        schemas(
            // Sites
            crate::models::Localizacao,
            crate::models::localizacao::LocalizacaoInput,
            crate::display::LocalizacaoRow,
            crate::api::LocalizacaoPage,
            // Equipment
            crate::models::Equipamento,
            crate::models::EquipamentoDetalhe,
            crate::models::TipoEquipamento,
            crate::models::equipamento::EquipamentoInput,
            crate::models::equipamento::EquipamentoAtivoUpdate,
            crate::display::EquipamentoRow,
            crate::api::EquipamentoPage,
            // Ports
            crate::models::PortaSwitch,
            crate::models::PortaDetalhe,
            crate::models::PortaResumo,
            crate::models::Velocidade,
            crate::models::Duplex,
            crate::models::TipoConexao,
            crate::models::porta::PortaInput,
            crate::models::porta::PortaBulkUpdate,
            crate::display::PortaRow,
            crate::api::PortaPage,
            crate::services::filtros::FilterOption,
            crate::services::filtros::FilterDescription,
            // Maintenance
            crate::models::Manutencao,
            crate::models::ManutencaoDetalhe,
            crate::models::TipoManutencao,
            crate::models::manutencao::ManutencaoInput,
            crate::display::ManutencaoRow,
            crate::api::ManutencaoPage,
            // Shared
            crate::display::Link,
            crate::display::CrossRef,
            crate::api::BulkUpdateResponse,
            crate::services::lookup::EquipamentoResumo,
            crate::services::lookup::PortasPorEquipamento,
            lookup::ErroResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "localizacoes", description = "Sites"),
        (name = "equipamentos", description = "Network equipment"),
        (name = "portas", description = "Switch and router ports"),
        (name = "manutencoes", description = "Maintenance history"),
        (name = "rede", description = "Port lookup for admin forms")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
