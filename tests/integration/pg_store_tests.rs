//! PostgreSQL store tests against a live database
//!
//! Run with: DATABASE_URL=postgres://... cargo test --test pg_store_tests -- --ignored

use serde_json::json;
use sqlx::postgres::PgPoolOptions;

use rede_inventory::{
    error::AppError,
    models::{equipamento::EquipamentoInput, manutencao::ManutencaoInput, porta::PortaInput},
    repository::{EquipamentoStore, ManutencaoStore, PgStore, PortaStore, MSG_PORTA_DUPLICADA},
};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    PgStore::new(pool)
}

fn switch(nome: &str) -> EquipamentoInput {
    serde_json::from_value(json!({
        "nome": format!("{}-{}", nome, chrono::Utc::now().timestamp_micros()),
        "tipo": "SW",
        "modelo": "CRS326",
        "marca": "MikroTik"
    }))
    .unwrap()
}

fn porta(equipamento_id: i32, numero: i32, conectado: Option<i32>) -> PortaInput {
    serde_json::from_value(json!({
        "equipamento_id": equipamento_id,
        "numero": numero,
        "equipamento_conectado_id": conectado
    }))
    .unwrap()
}

fn assert_integrity(result: Result<impl std::fmt::Debug, AppError>, expected: &str) {
    match result {
        Err(AppError::Integrity(msg)) => assert!(msg.contains(expected), "unexpected message: {}", msg),
        other => panic!("expected integrity error, got {:?}", other),
    }
}

#[tokio::test]
#[ignore]
async fn test_duplicate_port_number_is_integrity_error() {
    let store = store().await;
    let sw = store.equipamentos_create(&switch("pg-dup")).await.unwrap();

    store.portas_create(&porta(sw.id, 1, None)).await.unwrap();
    assert_integrity(
        store.portas_create(&porta(sw.id, 1, None)).await,
        MSG_PORTA_DUPLICADA,
    );

    let p2 = store.portas_create(&porta(sw.id, 2, None)).await.unwrap();
    assert_integrity(
        store.portas_update(p2.id, &porta(sw.id, 1, None)).await,
        MSG_PORTA_DUPLICADA,
    );

    store.equipamentos_delete(sw.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_dangling_references_are_integrity_errors() {
    let store = store().await;
    let sw = store.equipamentos_create(&switch("pg-fk")).await.unwrap();

    assert_integrity(
        store.portas_create(&porta(i32::MAX, 1, None)).await,
        "Referência inexistente",
    );
    assert_integrity(
        store.portas_create(&porta(sw.id, 1, Some(i32::MAX))).await,
        "Referência inexistente",
    );

    let mut equipamento = switch("pg-fk-site");
    equipamento.localizacao_id = Some(i32::MAX);
    assert_integrity(
        store.equipamentos_create(&equipamento).await,
        "Referência inexistente",
    );

    let manutencao: ManutencaoInput = serde_json::from_value(json!({
        "equipamento_id": i32::MAX,
        "tipo": "CONF",
        "data_hora_inicio": "2024-05-10T09:00:00Z",
        "descricao": "VLANs",
        "acoes_realizadas": "Criadas",
        "responsavel": "Ana"
    }))
    .unwrap();
    assert_integrity(
        store.manutencoes_create(&manutencao).await,
        "Referência inexistente",
    );

    store.equipamentos_delete(sw.id).await.unwrap();
}
