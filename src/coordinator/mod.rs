//! The game session coordinator.
//!
//! Owns every live game and is its only writer. Each game sits behind its
//! own mutex inside a registry, so action submission is strictly
//! serialized per game while different games proceed independently; no
//! operation ever touches two games at once.
//!
//! Commit discipline: clone the game, apply the action to the clone, audit
//! invariants, swap. A rejection or a breach leaves the committed state
//! byte-for-byte untouched, and `state()` reads always observe a
//! consistent post-commit snapshot.
//!
//! After a committed human action the coordinator synchronously drives the
//! NPC inside the same locked section whenever the next actor is an NPC:
//! its turn, or a pending trade awaiting its answer. A pending trade
//! addressed to a human pauses the drive loop so the offer survives until
//! the human responds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::core::constants::MAX_NPC_ACTIONS_PER_TURN;
use crate::core::dice::DiceRoll;
use crate::core::id::{GameId, PlayerId};
use crate::core::player::Difficulty;
use crate::engine::{self, PlayerAction};
use crate::error::{EngineError, InvariantBreach};
use crate::npc;
use crate::state::{EventRecord, Game, GameStatus, TurnPhase};

/// Why an update record was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
    GameCreated,
    PlayerJoined,
    GameCancelled,
    ActionApplied,
}

/// Lightweight record handed to the broadcast collaborator per commit.
#[derive(Clone, Debug, Serialize)]
pub struct GameUpdate {
    pub game_id: GameId,
    pub kind: UpdateKind,
    pub triggered_by: Option<PlayerId>,
    pub turn_number: u32,
    pub current_player: PlayerId,
    pub turn_phase: TurnPhase,
    pub status: GameStatus,
    pub dice_roll: Option<DiceRoll>,
    pub events: Vec<EventRecord>,
    pub timestamp: DateTime<Utc>,
}

/// Result of a successfully applied action.
#[derive(Clone, Debug)]
pub struct ActionOutcome {
    /// Events appended by this submission, NPC follow-up included.
    pub events: Vec<EventRecord>,
    /// The submitting player's roll, when the action was a roll.
    pub dice_roll: Option<DiceRoll>,
    /// Record for the broadcast collaborator.
    pub update: GameUpdate,
    /// Post-commit snapshot for the persistence collaborator.
    pub state: Game,
}

struct GameCell {
    game: Game,
    /// Set when an invariant breach was detected; the game refuses all
    /// further actions until someone investigates.
    halted: Option<InvariantBreach>,
}

/// Registry of live games with per-game exclusive access.
pub struct Coordinator {
    games: RwLock<FxHashMap<GameId, Arc<Mutex<GameCell>>>>,
    next_game_id: AtomicU64,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            games: RwLock::new(FxHashMap::default()),
            next_game_id: AtomicU64::new(1),
        }
    }

    /// Create a game with the creator in seat 0.
    ///
    /// With `npc` set the game starts immediately against that tier;
    /// otherwise it waits for [`join_game`](Self::join_game).
    pub fn create_game(
        &self,
        creator_name: &str,
        npc: Option<Difficulty>,
        seed: u64,
    ) -> (GameId, PlayerId, GameUpdate) {
        let game_id = GameId::new(self.next_game_id.fetch_add(1, Ordering::Relaxed));
        let game = Game::create(game_id, creator_name, npc, seed);
        let creator = PlayerId::new(0);
        let events = game.events_since(0);
        let update = build_update(&game, UpdateKind::GameCreated, Some(creator), None, events);

        info!(%game_id, creator = creator_name, vs_npc = npc.is_some(), "game created");
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                game_id,
                Arc::new(Mutex::new(GameCell { game, halted: None })),
            );

        (game_id, creator, update)
    }

    /// Seat the second player; the game starts once full.
    pub fn join_game(
        &self,
        game_id: GameId,
        name: &str,
    ) -> Result<(PlayerId, GameUpdate), EngineError> {
        let cell = self.cell(game_id)?;
        let mut guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
        require_not_halted(game_id, &guard)?;

        let cursor = guard.game.event_cursor();
        let mut next = guard.game.clone();
        let player_id = next.join(name).map_err(EngineError::Rejected)?;
        next.bump_version();
        commit(game_id, &mut guard, next)?;

        let events = guard.game.events_since(cursor);
        let update = build_update(
            &guard.game,
            UpdateKind::PlayerJoined,
            Some(player_id),
            None,
            events,
        );
        info!(%game_id, %player_id, name, "player joined");
        Ok((player_id, update))
    }

    /// Abandon a game that never left `Waiting` (lobby collaborator).
    pub fn cancel_game(&self, game_id: GameId) -> Result<GameUpdate, EngineError> {
        let cell = self.cell(game_id)?;
        let mut guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
        require_not_halted(game_id, &guard)?;

        let mut next = guard.game.clone();
        next.cancel().map_err(EngineError::Rejected)?;
        next.bump_version();
        commit(game_id, &mut guard, next)?;

        info!(%game_id, "game cancelled");
        Ok(build_update(
            &guard.game,
            UpdateKind::GameCancelled,
            None,
            None,
            Vec::new(),
        ))
    }

    /// Apply one player action against a game.
    ///
    /// Exactly one submission holds the game's lock at a time; stale or
    /// duplicate submissions are rejected against the committed state
    /// rather than interleaving with it.
    pub fn submit_action(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        action: &PlayerAction,
    ) -> Result<ActionOutcome, EngineError> {
        let cell = self.cell(game_id)?;
        let mut guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
        require_not_halted(game_id, &guard)?;

        if !guard.game.has_player(player_id) {
            return Err(EngineError::PlayerNotInGame {
                game: game_id,
                player: player_id,
            });
        }

        debug!(%game_id, %player_id, action = action.kind(), "action submitted");
        let cursor = guard.game.event_cursor();

        let mut next = guard.game.clone();
        let dice_roll = engine::apply_action(&mut next, player_id, action)
            .map_err(EngineError::Rejected)?;
        next.bump_version();
        commit(game_id, &mut guard, next)?;

        drive_npcs(game_id, &mut guard);
        if let Some(breach) = guard.halted.clone() {
            return Err(EngineError::Halted {
                game: game_id,
                breach,
            });
        }

        let events = guard.game.events_since(cursor);
        info!(
            %game_id,
            %player_id,
            action = action.kind(),
            events = events.len(),
            version = guard.game.version,
            "action committed"
        );
        let update = build_update(
            &guard.game,
            UpdateKind::ActionApplied,
            Some(player_id),
            dice_roll,
            events.clone(),
        );
        Ok(ActionOutcome {
            events,
            dice_roll,
            update,
            state: guard.game.clone(),
        })
    }

    /// Consistent post-commit snapshot of a game.
    pub fn state(&self, game_id: GameId) -> Result<Game, EngineError> {
        let cell = self.cell(game_id)?;
        let guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.game.clone())
    }

    /// Encode a game's snapshot for the persistence collaborator.
    pub fn export_snapshot(&self, game_id: GameId) -> Result<Vec<u8>, EngineError> {
        let state = self.state(game_id)?;
        bincode::serialize(&state).map_err(|_| EngineError::SnapshotInvalid)
    }

    /// Rehydrate a game from persisted snapshot bytes.
    ///
    /// The snapshot carries the RNG word position, so the restored game
    /// continues the exact dice stream it left off on.
    pub fn restore_snapshot(&self, bytes: &[u8]) -> Result<GameId, EngineError> {
        let game: Game = bincode::deserialize(bytes).map_err(|_| EngineError::SnapshotInvalid)?;
        let game_id = game.id;

        // Keep the id allocator ahead of everything restored.
        self.next_game_id
            .fetch_max(game_id.raw() + 1, Ordering::Relaxed);

        info!(%game_id, version = game.version, "game restored from snapshot");
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                game_id,
                Arc::new(Mutex::new(GameCell { game, halted: None })),
            );
        Ok(game_id)
    }

    fn cell(&self, game_id: GameId) -> Result<Arc<Mutex<GameCell>>, EngineError> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&game_id)
            .cloned()
            .ok_or(EngineError::GameNotFound(game_id))
    }
}

fn require_not_halted(game_id: GameId, cell: &GameCell) -> Result<(), EngineError> {
    match &cell.halted {
        Some(breach) => Err(EngineError::Halted {
            game: game_id,
            breach: breach.clone(),
        }),
        None => Ok(()),
    }
}

/// Audit and swap in the next state, halting the game on a breach.
fn commit(game_id: GameId, cell: &mut GameCell, next: Game) -> Result<(), EngineError> {
    if let Err(breach) = next.audit_invariants() {
        error!(%game_id, %breach, "invariant breach detected; halting game");
        cell.halted = Some(breach.clone());
        return Err(EngineError::Halted {
            game: game_id,
            breach,
        });
    }
    cell.game = next;
    Ok(())
}

/// Drive NPC actions until a human is up, capped per submission.
fn drive_npcs(game_id: GameId, cell: &mut GameCell) {
    let mut driven = 0;
    while driven < MAX_NPC_ACTIONS_PER_TURN {
        let Some((npc_id, difficulty)) = npc_to_act(&cell.game) else {
            return;
        };
        let action = npc::choose_action(&cell.game, npc_id, difficulty);
        debug!(%game_id, %npc_id, ?difficulty, action = action.kind(), "npc action");

        let mut next = cell.game.clone();
        match engine::apply_action(&mut next, npc_id, &action) {
            Ok(_) => {
                next.bump_version();
                if commit(game_id, cell, next).is_err() {
                    return;
                }
            }
            Err(violation) => {
                // The policy never proposes illegal actions; if it does,
                // stop driving rather than loop.
                warn!(%game_id, %npc_id, %violation, "npc action rejected");
                return;
            }
        }
        driven += 1;
    }
    warn!(%game_id, cap = MAX_NPC_ACTIONS_PER_TURN, "npc action cap reached; forcing end turn");

    // Close the turn so the game cannot strand with the NPC.
    if let Some((npc_id, _)) = npc_to_act(&cell.game) {
        let mut next = cell.game.clone();
        if engine::apply_action(&mut next, npc_id, &PlayerAction::EndTurn).is_ok() {
            next.bump_version();
            let _ = commit(game_id, cell, next);
        }
    }
}

/// The NPC that must act next, if any.
///
/// A pending trade belongs to its receiver: an NPC receiver answers
/// immediately, a human receiver pauses NPC driving. Otherwise the
/// current player acts when it is an NPC seat.
fn npc_to_act(game: &Game) -> Option<(PlayerId, Difficulty)> {
    if game.status != GameStatus::InProgress {
        return None;
    }
    if let Some(trade) = &game.pending_trade {
        let receiver = game.player(trade.offered_to)?;
        return receiver.npc.map(|d| (receiver.id, d));
    }
    let current = game.current()?;
    current.npc.map(|d| (current.id, d))
}

fn build_update(
    game: &Game,
    kind: UpdateKind,
    triggered_by: Option<PlayerId>,
    dice_roll: Option<DiceRoll>,
    events: Vec<EventRecord>,
) -> GameUpdate {
    GameUpdate {
        game_id: game.id,
        kind,
        triggered_by,
        turn_number: game.turn_number,
        current_player: game.current_player,
        turn_phase: game.turn_phase,
        status: game.status,
        dice_roll,
        events,
        timestamp: Utc::now(),
    }
}
