// src/domain/auctions.rs
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::collection::merge;
use super::core::{has_id, Entity, EntityId, Errors};

pub const ESTADO_FIELD: &str = "estado";
pub const OFERTAS_FIELD: &str = "ofertas";
pub const OFERTA_FIELD: &str = "oferta";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estado {
    Abierto,
    Cerrado,
}

impl Estado {
    /// State stored on the auction, if it is one of the two known values.
    pub fn of(auction: &Entity) -> Option<Estado> {
        auction
            .get(ESTADO_FIELD)
            .and_then(Value::as_str)
            .and_then(|s| Estado::from_str(s).ok())
    }

    /// `Cerrado` opens; anything else, including a missing or unknown state,
    /// closes.
    pub fn toggled(current: Option<Estado>) -> Estado {
        match current {
            Some(Estado::Cerrado) => Estado::Abierto,
            _ => Estado::Cerrado,
        }
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estado::Abierto => write!(f, "Abierto"),
            Estado::Cerrado => write!(f, "Cerrado"),
        }
    }
}

impl FromStr for Estado {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Abierto" => Ok(Estado::Abierto),
            "Cerrado" => Ok(Estado::Cerrado),
            _ => Err(format!("Unknown auction state: {}", s)),
        }
    }
}

/// What happens to the stored bids when a new one arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BidPolicy {
    /// New bids are appended; earlier bids are kept.
    #[default]
    Append,
    /// The stored list is replaced by the new bid alone. Numbering still
    /// counts the bids that were there before.
    Replace,
}

impl fmt::Display for BidPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BidPolicy::Append => write!(f, "append"),
            BidPolicy::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for BidPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(BidPolicy::Append),
            "replace" => Ok(BidPolicy::Replace),
            _ => Err(format!("Unknown bid policy: {}", s)),
        }
    }
}

fn find_mut(auctions: &mut [Entity], id: EntityId) -> Result<&mut Entity, Errors> {
    auctions
        .iter_mut()
        .find(|a| has_id(a, id))
        .ok_or(Errors::UnknownAuction(id))
}

pub fn toggle_state(auctions: &mut [Entity], id: EntityId) -> Result<Estado, Errors> {
    let auction = find_mut(auctions, id)?;
    let next = Estado::toggled(Estado::of(auction));
    auction.insert(ESTADO_FIELD.to_string(), Value::from(next.to_string()));
    Ok(next)
}

pub fn bid_count(auction: &Entity) -> usize {
    auction
        .get(OFERTAS_FIELD)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Places `{ oferta: n, ...payload }` on an open auction, where `n` is the
/// number of bids already stored plus one.
pub fn place_bid(
    auctions: &mut [Entity],
    id: EntityId,
    payload: Entity,
    policy: BidPolicy,
) -> Result<Entity, Errors> {
    let auction = find_mut(auctions, id)?;
    if Estado::of(auction) != Some(Estado::Abierto) {
        return Err(Errors::AuctionClosed(id));
    }

    let mut bid = Entity::new();
    bid.insert(OFERTA_FIELD.to_string(), Value::from(bid_count(auction) + 1));
    merge(&mut bid, payload);

    let stored = Value::Object(bid.clone());
    if policy == BidPolicy::Append {
        if let Some(Value::Array(bids)) = auction.get_mut(OFERTAS_FIELD) {
            bids.push(stored);
            return Ok(bid);
        }
    }
    auction.insert(OFERTAS_FIELD.to_string(), Value::Array(vec![stored]));
    Ok(bid)
}
