//! Trade offers between the two players.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::id::{PlayerId, PropertyId, TradeId};
use crate::core::money::Money;

/// Property lists in a trade are tiny; three slots cover a whole group
/// without heap allocation.
pub type PropertyList = SmallVec<[PropertyId; 3]>;

/// Lifecycle of a trade offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

/// The payload of a `ProposeTrade` action: what the proposer gives and
/// what they want back. The engine assigns the id and tracks status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    /// The receiving player.
    pub to: PlayerId,
    pub offered_properties: PropertyList,
    pub offered_currency: Money,
    pub requested_properties: PropertyList,
    pub requested_currency: Money,
}

/// A proposed bilateral exchange awaiting the receiver's decision.
///
/// At most one offer is pending per game; ending the turn cancels it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub id: TradeId,
    pub offered_by: PlayerId,
    pub offered_to: PlayerId,
    /// What the offering player gives.
    pub offered_properties: PropertyList,
    pub offered_currency: Money,
    /// What the offering player wants.
    pub requested_properties: PropertyList,
    pub requested_currency: Money,
    pub status: TradeStatus,
}

impl TradeOffer {
    /// Build a pending offer from a proposal.
    #[must_use]
    pub fn from_proposal(id: TradeId, offered_by: PlayerId, proposal: TradeProposal) -> Self {
        Self {
            id,
            offered_by,
            offered_to: proposal.to,
            offered_properties: proposal.offered_properties,
            offered_currency: proposal.offered_currency,
            requested_properties: proposal.requested_properties,
            requested_currency: proposal.requested_currency,
            status: TradeStatus::Pending,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, TradeStatus::Pending)
    }
}
