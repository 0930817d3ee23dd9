use serde_json::{json, Value};
use std::fs;
use subastas_api::domain::{insert, Errors, HandleError, IdPolicy, Lista, Subastas};
use subastas_api::persistence::json_file::{
    read_container, write_container, FailurePolicy, JsonFileStore, PersistenceError,
};
use tempfile::TempDir;
#[path = "utils/mod.rs"]
mod utils;
use utils::*;

#[test]
fn test_load_missing_file_reports_missing() {
    let dir = TempDir::new().unwrap();
    let store: JsonFileStore<Subastas> = JsonFileStore::new(auctions_path(&dir), FailurePolicy::Surface);
    assert!(matches!(store.load(), Err(PersistenceError::Missing(_))));
}

#[test]
fn test_read_missing_file_is_empty_collection() {
    let dir = TempDir::new().unwrap();
    let store: JsonFileStore<Subastas> = JsonFileStore::new(auctions_path(&dir), FailurePolicy::Surface);
    let auctions = store.read(|items| items.to_vec()).unwrap();
    assert!(auctions.is_empty());
}

#[test]
fn test_save_writes_pretty_container() {
    let dir = TempDir::new().unwrap();
    let path = users_path(&dir);
    let container = Lista { lista: sample_users(), ..Lista::default() };
    write_container(&path, &container).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"lista\": ["));
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["lista"][1]["nombre"], json!("Luis"));

    let back: Lista = read_container(&path).unwrap();
    assert_eq!(back, container);
}

#[test]
fn test_unknown_top_level_keys_survive_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = auctions_path(&dir);
    fs::write(&path, r#"{ "version": 2, "subastas": [] }"#).unwrap();

    let store: JsonFileStore<Subastas> = JsonFileStore::new(&path, FailurePolicy::Surface);
    store
        .modify(|auctions| Ok(insert(auctions, open_auction(), IdPolicy::MaxPlusOne)?))
        .unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["version"], json!(2));
    assert_eq!(value["subastas"][0]["id"], json!(1));
}

#[test]
fn test_container_without_collection_key_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = users_path(&dir);
    fs::write(&path, "{}").unwrap();

    let users: Lista = read_container(&path).unwrap();
    assert!(users.lista.is_empty());
}

#[test]
fn test_modify_persists_on_success() {
    let dir = TempDir::new().unwrap();
    let store: JsonFileStore<Subastas> = JsonFileStore::new(auctions_path(&dir), FailurePolicy::Surface);

    let created = store
        .modify(|auctions| Ok(insert(auctions, open_auction(), IdPolicy::MaxPlusOne)?))
        .unwrap();
    assert_eq!(created["id"], json!(1));

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.subastas, vec![created]);
}

#[test]
fn test_modify_does_not_write_on_failure() {
    let dir = TempDir::new().unwrap();
    let path = auctions_path(&dir);
    let original = r#"{"subastas":[{"id":1,"estado":"Cerrado"}]}"#;
    fs::write(&path, original).unwrap();

    let store: JsonFileStore<Subastas> = JsonFileStore::new(&path, FailurePolicy::Surface);
    let result: Result<(), HandleError> = store.modify(|_| Err(Errors::UnknownAuction(5).into()));

    assert!(matches!(result, Err(HandleError::Domain(Errors::UnknownAuction(5)))));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_corrupt_file_surfaces_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = auctions_path(&dir);
    fs::write(&path, "{ not json").unwrap();

    let store: JsonFileStore<Subastas> = JsonFileStore::new(&path, FailurePolicy::Surface);
    let result = store.read(|items| items.len());
    assert!(matches!(result, Err(HandleError::Persistence(PersistenceError::Parse { .. }))));

    let result = store.modify(|auctions| Ok(insert(auctions, open_auction(), IdPolicy::MaxPlusOne)?));
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn test_corrupt_file_masked_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = auctions_path(&dir);
    fs::write(&path, "{ not json").unwrap();

    let store: JsonFileStore<Subastas> = JsonFileStore::new(&path, FailurePolicy::Mask);
    assert_eq!(store.read(|items| items.len()).unwrap(), 0);

    let created = store
        .modify(|auctions| Ok(insert(auctions, open_auction(), IdPolicy::MaxPlusOne)?))
        .unwrap();
    assert_eq!(created["id"], json!(1));
    assert_eq!(store.load().unwrap().subastas.len(), 1);
}

#[test]
fn test_write_failure_surfaced_or_masked() {
    let dir = TempDir::new().unwrap();
    // A directory path cannot be opened for writing
    let path = dir.path().join("missing-dir").join("data.json");

    let surfaced: JsonFileStore<Lista> = JsonFileStore::new(&path, FailurePolicy::Surface);
    let result = surfaced.modify(|users| Ok(insert(users, entity(json!({})), IdPolicy::MaxPlusOne)?));
    assert!(matches!(result, Err(HandleError::Persistence(PersistenceError::Write { .. }))));

    let masked: JsonFileStore<Lista> = JsonFileStore::new(&path, FailurePolicy::Mask);
    let result = masked.modify(|users| Ok(insert(users, entity(json!({})), IdPolicy::MaxPlusOne)?));
    assert!(result.is_ok());
    assert!(!path.exists());
}

#[test]
fn test_concurrent_inserts_are_not_lost() {
    let dir = TempDir::new().unwrap();
    let store = std::sync::Arc::new(JsonFileStore::<Lista>::new(users_path(&dir), FailurePolicy::Surface));

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = store.clone();
            std::thread::spawn(move || {
                store
                    .modify(|users| Ok(insert(users, entity(json!({ "n": n })), IdPolicy::MaxPlusOne)?))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let users = store.load().unwrap().lista;
    assert_eq!(users.len(), 8);
    let mut ids: Vec<i64> = users.iter().map(|u| u["id"].as_i64().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}
