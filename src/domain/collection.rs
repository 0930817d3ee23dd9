// src/domain/collection.rs
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::core::{entity_id, has_id, Entity, EntityId, Errors, ID_FIELD};

/// Top-level JSON document of one collection file.
///
/// Each collection lives under a single named key; any other key found in the
/// file is carried through a rewrite untouched.
pub trait Container: Serialize + DeserializeOwned + Default + Send + 'static {
    const KEY: &'static str;

    fn items(&self) -> &Vec<Entity>;
    fn items_mut(&mut self) -> &mut Vec<Entity>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subastas {
    #[serde(default)]
    pub subastas: Vec<Entity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Container for Subastas {
    const KEY: &'static str = "subastas";

    fn items(&self) -> &Vec<Entity> {
        &self.subastas
    }

    fn items_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.subastas
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lista {
    #[serde(default)]
    pub lista: Vec<Entity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Container for Lista {
    const KEY: &'static str = "lista";

    fn items(&self) -> &Vec<Entity> {
        &self.lista
    }

    fn items_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.lista
    }
}

/// How a new entity gets its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Highest numeric id in the collection plus one.
    #[default]
    MaxPlusOne,
    /// Collection length plus one. Can hand out an id that is still in use
    /// once entries have been deleted out of order.
    LengthPlusOne,
}

impl IdPolicy {
    /// Next id to hand out, or `IdSpaceExhausted` once the highest stored id
    /// is already `EntityId::MAX`.
    pub fn next_id(&self, items: &[Entity]) -> Result<EntityId, Errors> {
        let last = match self {
            IdPolicy::MaxPlusOne => items.iter().filter_map(entity_id).max().unwrap_or(0).max(0),
            IdPolicy::LengthPlusOne => EntityId::try_from(items.len()).unwrap_or(EntityId::MAX),
        };
        last.checked_add(1).ok_or(Errors::IdSpaceExhausted)
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::MaxPlusOne => write!(f, "max"),
            IdPolicy::LengthPlusOne => write!(f, "length"),
        }
    }
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(IdPolicy::MaxPlusOne),
            "length" => Ok(IdPolicy::LengthPlusOne),
            _ => Err(format!("Unknown id policy: {}", s)),
        }
    }
}

/// Shallow merge: every field of `patch` overwrites the field of the same
/// name in `target`, everything else is kept.
pub fn merge(target: &mut Entity, patch: Entity) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

pub fn list(items: &[Entity]) -> Vec<Entity> {
    items.to_vec()
}

pub fn find_by_id(items: &[Entity], id: EntityId) -> Option<&Entity> {
    items.iter().find(|e| has_id(e, id))
}

pub fn find_by_field<'a>(items: &'a [Entity], field: &str, value: &str) -> Option<&'a Entity> {
    items
        .iter()
        .find(|e| e.get(field).and_then(Value::as_str) == Some(value))
}

/// Appends `{ id, ...payload }` and returns the stored entity.
///
/// Fields of the payload win over the generated id.
pub fn insert(items: &mut Vec<Entity>, payload: Entity, policy: IdPolicy) -> Result<Entity, Errors> {
    let mut entity = Entity::new();
    entity.insert(ID_FIELD.to_string(), Value::from(policy.next_id(items)?));
    merge(&mut entity, payload);
    items.push(entity.clone());
    Ok(entity)
}

/// Merges `patch` into the entity with the given id, in place.
pub fn update(items: &mut [Entity], id: EntityId, patch: Entity) -> Option<Entity> {
    let entity = items.iter_mut().find(|e| has_id(e, id))?;
    merge(entity, patch);
    Some(entity.clone())
}

/// Removes every entity with the given id. Returns whether the collection
/// shrank.
pub fn delete(items: &mut Vec<Entity>, id: EntityId) -> bool {
    let before = items.len();
    items.retain(|e| !has_id(e, id));
    items.len() != before
}
