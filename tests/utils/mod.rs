#![allow(dead_code)]
use serde_json::{json, Value};
use std::path::PathBuf;
use subastas_api::config::AppConfig;
use subastas_api::domain::{Entity, Policies};
use subastas_api::persistence::json_file::FailurePolicy;
use tempfile::TempDir;
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

pub fn entity(value: Value) -> Entity {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {}", other),
    }
}

pub fn open_auction() -> Entity {
    entity(json!({ "titulo": "Reloj antiguo", "estado": "Abierto" }))
}

pub fn closed_auction() -> Entity {
    entity(json!({ "titulo": "Bicicleta", "estado": "Cerrado" }))
}

pub fn sample_auctions() -> Vec<Entity> {
    vec![
        entity(json!({ "id": 1, "titulo": "Reloj antiguo", "estado": "Abierto" })),
        entity(json!({ "id": 2, "titulo": "Bicicleta", "estado": "Cerrado" })),
        entity(json!({ "id": 3, "titulo": "Cuadro", "estado": "Abierto", "ofertas": [{ "oferta": 1, "monto": 50 }] })),
    ]
}

pub fn sample_users() -> Vec<Entity> {
    vec![
        entity(json!({ "id": 1, "nombre": "Ana", "categoria": "comprador" })),
        entity(json!({ "id": 2, "nombre": "Luis", "categoria": "vendedor" })),
        entity(json!({ "id": 3, "nombre": "Marta", "categoria": "comprador" })),
    ]
}

pub fn bid(monto: i64) -> Entity {
    entity(json!({ "monto": monto }))
}

pub fn legacy_policies() -> Policies {
    Policies {
        ids: subastas_api::domain::IdPolicy::LengthPlusOne,
        bids: subastas_api::domain::BidPolicy::Replace,
    }
}

pub fn auctions_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data.json")
}

pub fn users_path(dir: &TempDir) -> PathBuf {
    dir.path().join("usuarios.json")
}

pub fn test_config(dir: &TempDir, failures: FailurePolicy) -> AppConfig {
    AppConfig {
        auctions_file: auctions_path(dir),
        users_file: users_path(dir),
        failures,
        ..AppConfig::default()
    }
}
