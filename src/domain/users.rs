// src/domain/users.rs
use super::collection::find_by_field;
use super::core::Entity;

pub const CATEGORIA_FIELD: &str = "categoria";

/// First user whose `categoria` equals `categoria`. Categories are not
/// unique, so later matches are never returned.
pub fn find_by_category<'a>(users: &'a [Entity], categoria: &str) -> Option<&'a Entity> {
    find_by_field(users, CATEGORIA_FIELD, categoria)
}
