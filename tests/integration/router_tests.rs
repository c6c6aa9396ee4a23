//! In-process API tests over the memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use rede_inventory::{
    api::create_router,
    config::{AppConfig, StoreBackend},
    repository::MemoryStore,
    AppState,
};

fn app() -> Router {
    let mut config = AppConfig::default();
    config.database.backend = StoreBackend::Memory;
    create_router(AppState::new(config, Arc::new(MemoryStore::new())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {} -> {}", uri, value);
    value
}

async fn site(app: &Router, nome: &str) -> i64 {
    create(
        app,
        "/api/v1/localizacoes",
        json!({"nome": nome, "endereco": "Rua Principal, 10", "cor": "#00aa00"}),
    )
    .await["id"]
        .as_i64()
        .unwrap()
}

async fn equipment(app: &Router, nome: &str, tipo: &str, localizacao_id: Option<i64>) -> i64 {
    create(
        app,
        "/api/v1/equipamentos",
        json!({
            "nome": nome,
            "tipo": tipo,
            "modelo": "X1",
            "marca": "Acme",
            "localizacao_id": localizacao_id,
            "usuario": "admin",
            "senha": "segredo"
        }),
    )
    .await["id"]
        .as_i64()
        .unwrap()
}

async fn port(app: &Router, equipamento_id: i64, numero: i64, conectado: Option<i64>) -> i64 {
    create(
        app,
        "/api/v1/portas",
        json!({
            "equipamento_id": equipamento_id,
            "numero": numero,
            "descricao": format!("porta {}", numero),
            "equipamento_conectado_id": conectado
        }),
    )
    .await["id"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_lookup_without_id_is_bad_request() {
    let app = app();
    for uri in [
        "/rede/portas-por-equipamento/",
        "/rede/portas-por-equipamento/?equipamento_id=",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "ID do equipamento não fornecido"}));
    }
}

#[tokio::test]
async fn test_lookup_unknown_id_is_not_found() {
    let app = app();
    for uri in [
        "/rede/portas-por-equipamento/?equipamento_id=999",
        "/rede/portas-por-equipamento/?equipamento_id=abc",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["erro"].is_string());
    }
}

#[tokio::test]
async fn test_lookup_returns_ports_ordered_by_number() {
    let app = app();
    let sw = equipment(&app, "Core-01", "SW", None).await;
    let p3 = port(&app, sw, 3, None).await;
    let p1 = port(&app, sw, 1, None).await;
    let p2 = port(&app, sw, 2, None).await;

    let uri = format!("/rede/portas-por-equipamento/?equipamento_id={}", sw);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipamento"], json!({"id": sw, "nome": "Core-01", "tipo": "Switch"}));

    let portas = body["portas"].as_array().unwrap();
    let ids: Vec<i64> = portas.iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![p1, p2, p3]);
    for porta in portas {
        let mut keys: Vec<&str> = porta.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["descricao", "id", "numero"]);
    }
    // No credentials leak through the lookup
    assert!(!body.to_string().contains("segredo"));
}

#[tokio::test]
async fn test_lookup_repeated_id_keeps_last_value() {
    let app = app();
    let sw = equipment(&app, "Core-02", "SW", None).await;
    port(&app, sw, 1, None).await;

    let uri = format!(
        "/rede/portas-por-equipamento/?equipamento_id=999&equipamento_id={}",
        sw
    );
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipamento"]["id"], sw);
    assert_eq!(body["portas"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_lookup_malformed_query_answers_with_erro() {
    let app = app();
    for uri in [
        "/rede/portas-por-equipamento/?equipamento_id=%zz",
        "/rede/portas-por-equipamento/?equipamento_id=%FF",
        "/rede/portas-por-equipamento/?equipamento_id=1%",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body.as_object().unwrap().len(), 1);
        assert!(body["erro"].is_string());
    }
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = app();
    equipment(&app, "Core-1000", "SW", None).await;

    for term in ["%25", "10_0"] {
        let uri = format!("/api/v1/equipamentos?search={}", term);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0, "search={}", term);
    }
}

#[tokio::test]
async fn test_equipment_validation() {
    let app = app();
    let base = json!({"nome": "Core", "tipo": "SW", "modelo": "X", "marca": "Acme"});

    let mut body = base.clone();
    body["porta"] = json!(70000);
    let (status, err) = send(&app, Method::POST, "/api/v1/equipamentos", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["field"], "porta");

    let mut body = base.clone();
    body["ip_gerencia"] = json!("300.1.1.1");
    let (status, err) = send(&app, Method::POST, "/api/v1/equipamentos", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["field"], "ip_gerencia");

    let mut body = base;
    body["localizacao_id"] = json!(42);
    let (status, _) = send(&app, Method::POST, "/api/v1/equipamentos", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_password_is_never_returned() {
    let app = app();
    let id = equipment(&app, "Core", "RT", None).await;
    let (_, body) = send(&app, Method::GET, &format!("/api/v1/equipamentos/{}", id), None).await;
    assert!(body.get("senha").is_none());
    assert_eq!(body["usuario"], "admin");
}

#[tokio::test]
async fn test_duplicate_port_is_conflict() {
    let app = app();
    let sw = equipment(&app, "Core", "SW", None).await;
    port(&app, sw, 1, None).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/portas",
        Some(json!({"equipamento_id": sw, "numero": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Já existe uma porta com este número neste equipamento");
}

#[tokio::test]
async fn test_only_switches_and_routers_own_ports() {
    let app = app();
    let srv = equipment(&app, "Files", "SR", None).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/portas",
        Some(json!({"equipamento_id": srv, "numero": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "equipamento_id");
}

#[tokio::test]
async fn test_equipment_with_ports_keeps_network_type() {
    let app = app();
    let sw = equipment(&app, "Acesso-01", "SW", None).await;
    let update = |tipo: &str| {
        json!({"nome": "Acesso-01", "tipo": tipo, "modelo": "X1", "marca": "Acme"})
    };

    // No ports yet: any type is accepted
    let uri = format!("/api/v1/equipamentos/{}", sw);
    let (status, _) = send(&app, Method::PUT, &uri, Some(update("PC"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::PUT, &uri, Some(update("SW"))).await;
    assert_eq!(status, StatusCode::OK);

    port(&app, sw, 1, None).await;
    let (status, body) = send(&app, Method::PUT, &uri, Some(update("SR"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "tipo");

    let (status, body) = send(&app, Method::PUT, &uri, Some(update("RT"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipo"], "RT");
}

#[tokio::test]
async fn test_site_delete_keeps_equipment() {
    let app = app();
    let sede = site(&app, "Sede").await;
    let sw = equipment(&app, "Core", "SW", Some(sede)).await;

    let (_, listing) = send(&app, Method::GET, "/api/v1/localizacoes", None).await;
    assert_eq!(listing["items"][0]["qtd_equipamentos_label"], "1 equipamentos");
    assert_eq!(
        listing["items"][0]["colored_name"],
        r#"<span style="color: #00AA00;">Sede</span>"#
    );

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/localizacoes/{}", sede), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/equipamentos/{}", sw), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["localizacao_id"], Value::Null);
    assert_eq!(body["localizacao_link"], "-");
    assert_eq!(body["repr"], "Switch - Core (Sem localização)");
}

#[tokio::test]
async fn test_equipment_delete_cascades() {
    let app = app();
    let sw = equipment(&app, "Core", "SW", None).await;
    let rt = equipment(&app, "Borda", "RT", None).await;
    port(&app, sw, 1, None).await;
    let uplink = port(&app, rt, 1, Some(sw)).await;
    create(
        &app,
        "/api/v1/manutencoes",
        json!({
            "equipamento_id": sw,
            "tipo": "CORR",
            "data_hora_inicio": "2024-05-10T10:00:00Z",
            "data_hora_fim": "2024-05-10T12:30:00Z",
            "descricao": "Troca de fonte",
            "acoes_realizadas": "Fonte substituída",
            "responsavel": "Ana"
        }),
    )
    .await;

    let (_, listing) = send(&app, Method::GET, "/api/v1/manutencoes", None).await;
    assert_eq!(listing["items"][0]["duracao"], "2h 30m");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/equipamentos/{}", sw), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listing) = send(&app, Method::GET, "/api/v1/manutencoes", None).await;
    assert_eq!(listing["total"], 0);
    let (_, listing) = send(&app, Method::GET, "/api/v1/portas", None).await;
    assert_eq!(listing["total"], 1);

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/portas/{}", uplink), None).await;
    assert_eq!(body["equipamento_conectado_id"], Value::Null);
    assert_eq!(body["equipamento_conectado_link"], "-");
}

#[tokio::test]
async fn test_filter_options_only_list_connected_network_devices() {
    let app = app();
    let sede = site(&app, "Sede").await;
    let filial = site(&app, "Filial").await;
    let core = equipment(&app, "Core", "SW", Some(sede)).await;
    let borda = equipment(&app, "Borda", "RT", Some(filial)).await;
    let srv = equipment(&app, "Files", "SR", Some(sede)).await;
    // Connected to nothing and never a target
    equipment(&app, "Idle", "SW", None).await;

    port(&app, core, 1, Some(borda)).await;
    port(&app, core, 2, Some(srv)).await;
    port(&app, borda, 1, None).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/portas/filtros", None).await;
    assert_eq!(status, StatusCode::OK);
    let filtros = body.as_array().unwrap();

    let conectado = filtros
        .iter()
        .find(|f| f["parameter_name"] == "equipamento_conectado")
        .unwrap();
    assert_eq!(
        conectado["options"],
        json!([{"id": borda, "label": "Roteador - Borda"}])
    );

    let locais = filtros
        .iter()
        .find(|f| f["parameter_name"] == "localizacao_equipamento_conectado")
        .unwrap();
    assert_eq!(
        locais["options"],
        json!([{"id": filial, "label": "Filial"}, {"id": sede, "label": "Sede"}])
    );

    let (_, listing) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portas?equipamento_conectado={}", borda),
        None,
    )
    .await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["repr"], "Switch Core - Porta 1");

    let (_, listing) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portas?localizacao_equipamento_conectado={}", sede),
        None,
    )
    .await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["numero"], 2);
}

#[tokio::test]
async fn test_bulk_edits() {
    let app = app();
    let sw = equipment(&app, "Core", "SW", None).await;
    let p1 = port(&app, sw, 1, None).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/equipamentos/ativo",
        Some(json!([{"id": sw, "ativo": false}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/portas",
        Some(json!([{"id": p1, "status": false, "vlan": "20"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/portas/{}", p1), None).await;
    assert_eq!(body["status"], false);
    assert_eq!(body["vlan"], "20");

    let (_, listing) = send(&app, Method::GET, "/api/v1/equipamentos?ativo=false", None).await;
    assert_eq!(listing["total"], 1);
}

#[tokio::test]
async fn test_maintenance_end_before_start_is_rejected() {
    let app = app();
    let sw = equipment(&app, "Core", "SW", None).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/manutencoes",
        Some(json!({
            "equipamento_id": sw,
            "tipo": "PREV",
            "data_hora_inicio": "2024-05-10T10:00:00Z",
            "data_hora_fim": "2024-05-10T09:00:00Z",
            "descricao": "Limpeza",
            "acoes_realizadas": "Limpeza",
            "responsavel": "Ana"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "data_hora_fim");
}
