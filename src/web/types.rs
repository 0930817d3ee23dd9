use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{Lista, Policies, Subastas};
use crate::persistence::json_file::JsonFileStore;

pub const WELCOME: &str = "¡Bienvenido a la API de sistema de gestión de subastas en línea!";

#[derive(Debug, Clone)]
pub struct AppState {
    pub auctions: Arc<JsonFileStore<Subastas>>,
    pub users: Arc<JsonFileStore<Lista>>,
    pub policies: Policies,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        AppState {
            auctions: Arc::new(JsonFileStore::new(&config.auctions_file, config.failures)),
            users: Arc::new(JsonFileStore::new(&config.users_file, config.failures)),
            policies: config.policies,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: &str) -> Self {
        ApiError { error: error.to_string() }
    }
}

/// Body of a successful state toggle.
#[derive(Debug, Serialize, Deserialize)]
pub struct StateChanged {
    pub message: String,
}

/// Body of a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct Removed {
    pub mensaje: String,
}

/// Which collection a request addressed, for picking its messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Auction,
    User,
}

impl Resource {
    pub fn not_found(&self) -> &'static str {
        match self {
            Resource::Auction => "La Subasta no fue encontrada",
            Resource::User => "El usuario no fue encontrado",
        }
    }

    pub fn removed(&self) -> &'static str {
        match self {
            Resource::Auction => "La Subasta fue eliminada correctamente",
            Resource::User => "El usuario fue eliminado correctamente",
        }
    }
}
