//! Port lookup endpoint
//!
//! Unlike the rest of the API, every outcome here is a JSON body: failures
//! render as `{"erro": "..."}`.

use std::any::Any;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppError, services::lookup::PortasPorEquipamento, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupParams {
    /// Equipment ID
    pub equipamento_id: Option<String>,
}

impl LookupParams {
    /// A repeated `equipamento_id` keeps its last value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let equipamento_id = pairs
            .into_iter()
            .rev()
            .find(|(key, _)| key == "equipamento_id")
            .map(|(_, value)| value);
        Self { equipamento_id }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErroResponse {
    pub erro: String,
}

/// Any lookup failure, rendered as `{"erro": ...}`
#[derive(Debug)]
pub struct LookupFailure(pub AppError);

impl IntoResponse for LookupFailure {
    fn into_response(self) -> Response {
        let (status, erro) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            other => {
                tracing::error!("Port lookup failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(ErroResponse { erro })).into_response()
    }
}

/// Panic handler for the lookup router, keeps the `{"erro": ...}` contract
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Port lookup panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErroResponse {
            erro: "Erro interno do servidor".to_string(),
        }),
    )
        .into_response()
}

/// Ports of one equipment
#[utoipa::path(
    get,
    path = "/rede/portas-por-equipamento/",
    tag = "rede",
    params(LookupParams),
    responses(
        (status = 200, description = "Equipment and its ports ordered by number", body = PortasPorEquipamento),
        (status = 400, description = "Missing equipamento_id", body = ErroResponse),
        (status = 404, description = "Equipment not found", body = ErroResponse),
        (status = 500, description = "Unexpected failure", body = ErroResponse)
    )
)]
pub async fn portas_por_equipamento(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<PortasPorEquipamento>, LookupFailure> {
    let Query(pairs) = query.map_err(|e| LookupFailure(AppError::BadRequest(e.body_text())))?;
    let params = LookupParams::from_pairs(pairs);
    state
        .services
        .lookup
        .portas_por_equipamento(params.equipamento_id.as_deref())
        .await
        .map(Json)
        .map_err(LookupFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = LookupFailure(err).into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_failures_render_as_erro() {
        let (status, body) = render(AppError::BadRequest("ID do equipamento não fornecido".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"erro": "ID do equipamento não fornecido"}));

        let (status, body) = render(AppError::NotFound("Equipamento 9 não encontrado".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["erro"], "Equipamento 9 não encontrado");
    }

    #[tokio::test]
    async fn test_store_failure_is_500_with_message() {
        let (status, body) = render(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let erro = body["erro"].as_str().unwrap();
        assert!(erro.starts_with("Database error"));
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_repeated_parameter_keeps_last_value() {
        let pairs = vec![
            ("equipamento_id".to_string(), "1".to_string()),
            ("outro".to_string(), "x".to_string()),
            ("equipamento_id".to_string(), "2".to_string()),
        ];
        assert_eq!(LookupParams::from_pairs(pairs).equipamento_id.as_deref(), Some("2"));
        assert_eq!(LookupParams::from_pairs(Vec::new()).equipamento_id, None);
    }

    #[tokio::test]
    async fn test_panic_renders_as_erro() {
        let app = Router::new()
            .route(
                "/boom",
                get(|| async {
                    if true {
                        panic!("boom");
                    }
                    "unreachable"
                }),
            )
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({"erro": "Erro interno do servidor"}));
    }
}
