//! Live API tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Create a switch and return its id
async fn create_switch(client: &Client, nome: &str) -> i64 {
    let response = client
        .post(format!("{}/api/v1/equipamentos", BASE_URL))
        .json(&json!({
            "nome": nome,
            "tipo": "SW",
            "modelo": "CRS326",
            "marca": "MikroTik"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn delete_equipment(client: &Client, id: i64) {
    client
        .delete(format!("{}/api/v1/equipamentos/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/v1/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/v1/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_lookup_missing_id() {
    let client = Client::new();

    let response = client
        .get(format!("{}/rede/portas-por-equipamento/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["erro"], "ID do equipamento não fornecido");
}

#[tokio::test]
#[ignore]
async fn test_lookup_round_trip() {
    let client = Client::new();
    let sw = create_switch(&client, "live-test-switch").await;

    for numero in [2, 1] {
        let response = client
            .post(format!("{}/api/v1/portas", BASE_URL))
            .json(&json!({"equipamento_id": sw, "numero": numero}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/rede/portas-por-equipamento/", BASE_URL))
        .query(&[("equipamento_id", sw.to_string())])
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["equipamento"]["tipo"], "Switch");
    assert_eq!(body["portas"][0]["numero"], 1);
    assert_eq!(body["portas"][1]["numero"], 2);

    delete_equipment(&client, sw).await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_port_conflict() {
    let client = Client::new();
    let sw = create_switch(&client, "live-test-dup").await;

    let port = json!({"equipamento_id": sw, "numero": 1});
    let first = client
        .post(format!("{}/api/v1/portas", BASE_URL))
        .json(&port)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/api/v1/portas", BASE_URL))
        .json(&port)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);

    delete_equipment(&client, sw).await;
}
