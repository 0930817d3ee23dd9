// src/domain/mod.rs
pub mod auctions;
pub mod collection;
pub mod commands;
pub mod core;
pub mod users;

use thiserror::Error;

use crate::persistence::json_file::PersistenceError;

pub use self::auctions::*;
pub use self::collection::*;
pub use self::commands::*;
pub use self::core::*;
pub use self::users::*;

/// Knobs that switch between the corrected behavior and exact parity with
/// the legacy service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policies {
    pub ids: IdPolicy,
    pub bids: BidPolicy,
}

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("Domain error: {0}")]
    Domain(#[from] Errors),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

pub fn handle_auction(
    command: AuctionCommand,
    auctions: &mut Vec<Entity>,
    policies: &Policies,
) -> Result<CommandSuccess, Errors> {
    match command {
        AuctionCommand::AddAuction { auction } => {
            insert(auctions, auction, policies.ids).map(CommandSuccess::Added)
        }

        AuctionCommand::UpdateAuction { id, patch } => update(auctions, id, patch)
            .map(CommandSuccess::Updated)
            .ok_or(Errors::UnknownAuction(id)),

        AuctionCommand::RemoveAuction { id } => {
            if delete(auctions, id) {
                Ok(CommandSuccess::Removed(id))
            } else {
                Err(Errors::UnknownAuction(id))
            }
        }

        AuctionCommand::ToggleState { id } => {
            let estado = toggle_state(auctions, id)?;
            Ok(CommandSuccess::StateChanged { id, estado })
        }

        AuctionCommand::PlaceBid { id, bid } => {
            place_bid(auctions, id, bid, policies.bids).map(CommandSuccess::BidAccepted)
        }
    }
}

pub fn handle_user(
    command: UserCommand,
    users: &mut Vec<Entity>,
    policies: &Policies,
) -> Result<CommandSuccess, Errors> {
    match command {
        UserCommand::AddUser { user } => insert(users, user, policies.ids).map(CommandSuccess::Added),

        UserCommand::UpdateUser { id, patch } => update(users, id, patch)
            .map(CommandSuccess::Updated)
            .ok_or(Errors::UnknownUser(id)),

        UserCommand::RemoveUser { id } => {
            if delete(users, id) {
                Ok(CommandSuccess::Removed(id))
            } else {
                Err(Errors::UnknownUser(id))
            }
        }
    }
}
