// src/domain/core.rs
use serde_json::{Map, Value};
use thiserror::Error;

pub type EntityId = i64;

/// A stored record: a JSON object whose fields are whatever the caller sent,
/// plus the ones the service maintains (`id`, `estado`, `ofertas`, `oferta`).
pub type Entity = Map<String, Value>;

pub const ID_FIELD: &str = "id";

/// Numeric id of an entity, if it has one.
///
/// Integral floats (`1.0`) count as ids since the file may have been edited by
/// hand or written by another JSON producer.
pub fn entity_id(entity: &Entity) -> Option<EntityId> {
    let value = entity.get(ID_FIELD)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as EntityId)
    })
}

pub fn has_id(entity: &Entity, id: EntityId) -> bool {
    entity_id(entity) == Some(id)
}

/// Parses an id taken from a request path. Anything that is not an integer
/// matches no entity.
pub fn parse_id(raw: &str) -> Option<EntityId> {
    raw.trim().parse().ok()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    #[error("Unknown auction: {0}")]
    UnknownAuction(EntityId),

    #[error("Unknown user: {0}")]
    UnknownUser(EntityId),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Auction is not open for bids: {0}")]
    AuctionClosed(EntityId),

    #[error("No ids left to assign")]
    IdSpaceExhausted,
}
