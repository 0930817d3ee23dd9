use super::auctions::Estado;
use super::core::{Entity, EntityId};

/// Mutations on the auctions collection.
#[derive(Debug, Clone, PartialEq)]
pub enum AuctionCommand {
    AddAuction { auction: Entity },
    UpdateAuction { id: EntityId, patch: Entity },
    RemoveAuction { id: EntityId },
    ToggleState { id: EntityId },
    PlaceBid { id: EntityId, bid: Entity },
}

/// Mutations on the users collection.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    AddUser { user: Entity },
    UpdateUser { id: EntityId, patch: Entity },
    RemoveUser { id: EntityId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandSuccess {
    Added(Entity),
    Updated(Entity),
    Removed(EntityId),
    StateChanged { id: EntityId, estado: Estado },
    BidAccepted(Entity),
}
