//! The game aggregate.
//!
//! One `Game` owns a single session's truth: seats, phase, the per-game
//! property table, the pending trade, the event log and the dice RNG.
//! All mutation happens through rules/engine functions invoked while the
//! coordinator holds the game's lock; the aggregate itself only offers
//! queries and low-level recording helpers.
//!
//! Cloning a `Game` is cheap: the growing parts (event log, owned-property
//! sets) are `im` persistent structures, which is what makes the
//! coordinator's clone-apply-swap commit viable.

use im::Vector as ImVector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Board, CourseGroup, ImprovementLevel};
use crate::core::constants::MAX_PLAYERS;
use crate::core::dice::DiceRoll;
use crate::core::id::{GameId, PlayerId, PropertyId, TradeId};
use crate::core::money::Money;
use crate::core::player::{Difficulty, Player};
use crate::core::rng::GameRng;
use crate::error::{InvariantBreach, RuleViolation};

use super::events::{EventRecord, GameEvent};
use super::trade::TradeOffer;

/// Lifecycle of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the second player to join.
    Waiting,
    InProgress,
    /// Ended with a winner; never resurrected.
    Completed,
    /// Abandoned before it started.
    Cancelled,
}

/// Externally visible phase within a turn.
///
/// Trade negotiation is not a phase: a pending trade rides alongside
/// `Action` and the proposer keeps acting. Turn handoff is momentary and
/// lands directly in the next player's `Roll`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The current player must roll.
    Roll,
    /// The current player may buy, improve, trade or end the turn.
    Action,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Roll => f.write_str("Roll"),
            TurnPhase::Action => f.write_str("Action"),
        }
    }
}

/// Per-game mutable state of one property.
///
/// Pricing stays on the shared board; this is the copy-on-write part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyState {
    pub owner: Option<PlayerId>,
    pub improvement: ImprovementLevel,
    pub mortgaged: bool,
}

impl PropertyState {
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Back to bank condition: unowned, unmortgaged, unimproved.
    pub fn reset(&mut self) {
        *self = PropertyState::default();
    }
}

/// A single game session's complete state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub status: GameStatus,
    /// Seats in seating order; `PlayerId` is the index.
    pub players: Vec<Player>,
    pub current_player: PlayerId,
    pub turn_phase: TurnPhase,
    pub turn_number: u32,
    pub winner: Option<PlayerId>,
    pub pending_trade: Option<TradeOffer>,
    /// The roll made this turn, if any. Cleared on turn handoff.
    pub last_roll: Option<DiceRoll>,
    /// Monotonically increasing commit counter.
    pub version: u64,
    properties: FxHashMap<PropertyId, PropertyState>,
    next_trade_id: u32,
    rng: GameRng,
    events: ImVector<EventRecord>,
    next_event_seq: u64,
}

impl Game {
    /// Create a game in `Waiting` with the creator in seat 0.
    ///
    /// With `npc` set, the NPC takes seat 1 immediately and the game
    /// starts; otherwise a second player must [`join`](Self::join).
    pub fn create(id: GameId, creator_name: &str, npc: Option<Difficulty>, seed: u64) -> Self {
        let creator = PlayerId::new(0);
        let mut game = Self {
            id,
            status: GameStatus::Waiting,
            players: vec![Player::new(creator, creator_name, None)],
            current_player: creator,
            turn_phase: TurnPhase::Roll,
            turn_number: 0,
            winner: None,
            pending_trade: None,
            last_roll: None,
            version: 0,
            properties: Board::standard()
                .properties()
                .map(|def| (def.id, PropertyState::default()))
                .collect(),
            next_trade_id: 0,
            rng: GameRng::new(seed),
            events: ImVector::new(),
            next_event_seq: 0,
        };
        game.record(GameEvent::GameCreated {
            creator,
            vs_npc: npc.is_some(),
        });

        if let Some(difficulty) = npc {
            let npc_id = PlayerId::new(1);
            game.players
                .push(Player::new(npc_id, difficulty.display_name(), Some(difficulty)));
            game.record(GameEvent::PlayerJoined {
                player: npc_id,
                name: difficulty.display_name().to_string(),
            });
            game.start();
        }

        game
    }

    /// Seat the second (human) player. Starts the game once full.
    pub fn join(&mut self, name: &str) -> Result<PlayerId, RuleViolation> {
        if self.status != GameStatus::Waiting {
            return Err(RuleViolation::NotJoinable);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RuleViolation::GameFull);
        }

        let id = PlayerId::new(self.players.len() as u8);
        self.players.push(Player::new(id, name, None));
        self.record(GameEvent::PlayerJoined {
            player: id,
            name: name.to_string(),
        });

        if self.players.len() == MAX_PLAYERS {
            self.start();
        }
        Ok(id)
    }

    /// Abandon a game that never started.
    pub fn cancel(&mut self) -> Result<(), RuleViolation> {
        if self.status != GameStatus::Waiting {
            return Err(RuleViolation::NotCancellable);
        }
        self.status = GameStatus::Cancelled;
        Ok(())
    }

    fn start(&mut self) {
        self.status = GameStatus::InProgress;
        self.current_player = self.players[0].id;
        self.turn_phase = TurnPhase::Roll;
        self.turn_number = 1;
        self.record(GameEvent::GameStarted {
            first_player: self.current_player,
        });
    }

    // === Seats ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index()).filter(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index()).filter(|p| p.id == id)
    }

    #[must_use]
    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<&Player> {
        self.player(self.current_player)
    }

    /// The other seat.
    #[must_use]
    pub fn opponent_of(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id != id)
    }

    /// Non-bankrupt players in seating order.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.bankrupt)
    }

    #[must_use]
    pub fn is_current_npc(&self) -> bool {
        self.current().is_some_and(Player::is_npc)
    }

    /// The NPC seat, if this game has one.
    #[must_use]
    pub fn npc_seat(&self) -> Option<(PlayerId, Difficulty)> {
        self.players
            .iter()
            .find_map(|p| p.npc.map(|d| (p.id, d)))
    }

    // === Properties ===

    #[must_use]
    pub fn property_state(&self, id: PropertyId) -> Option<&PropertyState> {
        self.properties.get(&id)
    }

    pub fn property_state_mut(&mut self, id: PropertyId) -> Option<&mut PropertyState> {
        self.properties.get_mut(&id)
    }

    /// All per-game property states.
    pub fn property_states(&self) -> impl Iterator<Item = (PropertyId, &PropertyState)> {
        self.properties.iter().map(|(id, st)| (*id, st))
    }

    /// Properties owned by a player.
    pub fn properties_of(&self, player: PlayerId) -> impl Iterator<Item = (PropertyId, &PropertyState)> {
        self.properties
            .iter()
            .filter(move |(_, st)| st.owner == Some(player))
            .map(|(id, st)| (*id, st))
    }

    /// Whether a player owns every property in a group.
    #[must_use]
    pub fn owns_complete_group(&self, player: PlayerId, group: CourseGroup) -> bool {
        Board::standard()
            .group_members(group)
            .all(|def| self.property_state(def.id).is_some_and(|st| st.is_owned_by(player)))
    }

    /// Whether no property in a group is mortgaged.
    #[must_use]
    pub fn group_unmortgaged(&self, group: CourseGroup) -> bool {
        Board::standard()
            .group_members(group)
            .all(|def| self.property_state(def.id).is_some_and(|st| !st.mortgaged))
    }

    /// Groups a player fully owns.
    #[must_use]
    pub fn complete_groups(&self, player: PlayerId) -> Vec<CourseGroup> {
        CourseGroup::ALL
            .into_iter()
            .filter(|&g| self.owns_complete_group(player, g))
            .collect()
    }

    /// Cash plus purchase value plus built improvements.
    #[must_use]
    pub fn net_worth(&self, player: PlayerId) -> Money {
        let board = Board::standard();
        let Some(seat) = self.player(player) else {
            return Money::ZERO;
        };
        let holdings: Money = self
            .properties_of(player)
            .filter_map(|(id, st)| {
                board.property(id).map(|def| {
                    def.purchase_price
                        + def.improvement_cost.times(i64::from(st.improvement.steps()))
                })
            })
            .sum();
        seat.currency + holdings
    }

    // === Trades ===

    /// Allocate the next trade id.
    pub fn allocate_trade_id(&mut self) -> TradeId {
        let id = TradeId::new(self.next_trade_id);
        self.next_trade_id += 1;
        id
    }

    // === RNG ===

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === Event log ===

    /// Append an event to the log.
    pub fn record(&mut self, event: GameEvent) {
        let record = EventRecord {
            sequence: self.next_event_seq,
            turn_number: self.turn_number,
            event,
        };
        self.next_event_seq += 1;
        self.events.push_back(record);
    }

    /// The whole append-only log.
    #[must_use]
    pub fn events(&self) -> &ImVector<EventRecord> {
        &self.events
    }

    /// Sequence number the next event will get. Capture before an action
    /// to drain exactly that action's events afterwards.
    #[must_use]
    pub fn event_cursor(&self) -> u64 {
        self.next_event_seq
    }

    /// Events at or after a cursor, oldest first.
    #[must_use]
    pub fn events_since(&self, cursor: u64) -> Vec<EventRecord> {
        self.events
            .iter()
            .filter(|r| r.sequence >= cursor)
            .cloned()
            .collect()
    }

    /// Bump the commit counter.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    // === Invariants ===

    /// Defensive post-commit audit.
    ///
    /// Correct engine code never trips these; a breach halts the game at
    /// the coordinator instead of letting a corrupt state circulate.
    pub fn audit_invariants(&self) -> Result<(), InvariantBreach> {
        if self.players.len() > MAX_PLAYERS {
            return Err(InvariantBreach::TooManySeats);
        }

        for player in &self.players {
            if player.currency.is_negative() {
                return Err(InvariantBreach::NegativeCurrency(player.id));
            }
        }

        // Property table and per-player sets must mirror each other.
        for (&id, state) in &self.properties {
            match state.owner {
                Some(owner) => {
                    if !self.player(owner).is_some_and(|p| p.owns(id)) {
                        return Err(InvariantBreach::OwnershipMismatch(id));
                    }
                }
                None => {
                    if self.players.iter().any(|p| p.owns(id)) {
                        return Err(InvariantBreach::OwnershipMismatch(id));
                    }
                }
            }
        }
        for player in &self.players {
            for &id in &player.owned_properties {
                if !self
                    .property_state(id)
                    .is_some_and(|st| st.is_owned_by(player.id))
                {
                    return Err(InvariantBreach::OwnershipMismatch(id));
                }
            }
        }

        if self.status == GameStatus::InProgress {
            match self.current() {
                None => return Err(InvariantBreach::CurrentPlayerMissing(self.current_player)),
                Some(current) if current.bankrupt => {
                    return Err(InvariantBreach::BankruptOnTurn(current.id));
                }
                Some(_) => {}
            }
            if let Some(trade) = &self.pending_trade {
                if !self.has_player(trade.offered_by) || !self.has_player(trade.offered_to) {
                    return Err(InvariantBreach::TradePartyMissing);
                }
            }
        }

        if self.status == GameStatus::Completed && self.winner.is_none() {
            return Err(InvariantBreach::MissingWinner);
        }

        Ok(())
    }
}
