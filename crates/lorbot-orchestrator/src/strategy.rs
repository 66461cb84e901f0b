//! Strategy interface.
//!
//! A strategy takes one synchronous decision per call from a read-only view
//! of the board. It keeps no state between calls; the orchestrator owns
//! everything that must persist.

use lorbot_core::{BoardSnapshot, CardId, CardRecord, Phase, ResourceState, Zone};

/// Horizontal distance under which two cards in the attack lanes face each
/// other.
pub const LANE_MATCH_DELTA: i32 = 10;

/// Whether an opposing card already has a blocker facing it in `lane`.
pub fn is_lane_taken(lane: &[&CardRecord], opponent: &CardRecord) -> bool {
    let x = opponent.top_center().x;
    lane.iter()
        .any(|ally| (ally.top_center().x - x).abs() < LANE_MATCH_DELTA)
}

/// Read-only board view handed to the strategy.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    /// Current snapshot
    pub snapshot: &'a BoardSnapshot,
    /// Phase the orchestrator is handling
    pub phase: Phase,
    /// Mana and spell mana
    pub resources: ResourceState,
}

impl<'a> GameView<'a> {
    /// Create a view.
    pub fn new(snapshot: &'a BoardSnapshot, phase: Phase, resources: ResourceState) -> Self {
        Self {
            snapshot,
            phase,
            resources,
        }
    }

    /// Cards of a zone, left to right.
    pub fn zone(&self, zone: Zone) -> Vec<&'a CardRecord> {
        self.snapshot.zone(zone).collect()
    }

    /// Hand cards that can be paid for, most expensive first.
    pub fn playable_cards(&self) -> Vec<&'a CardRecord> {
        let mut playable: Vec<&CardRecord> = self
            .snapshot
            .zone(Zone::Hand)
            .filter(|card| self.resources.can_afford(card.cost(), card.is_spell()))
            .collect();
        playable.sort_by_key(|card| std::cmp::Reverse(card.cost()));
        playable
    }
}

/// Coarse decision for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameplayAction {
    /// Move to attacks
    Attack,
    /// Play cards from hand
    PlayCards,
    /// Pass
    Skip,
}

/// What a played card targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTarget {
    /// A card on the board
    Card(CardId),
    /// The local nexus
    Nexus,
    /// The opposing nexus
    OpponentNexus,
}

/// A card to play and its targets, clicked in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayChoice {
    /// Card to play
    pub card: CardId,
    /// Targets clicked after the card is dragged out
    pub targets: Vec<CardTarget>,
}

impl PlayChoice {
    /// Play a card without targets.
    pub fn untargeted(card: CardId) -> Self {
        Self {
            card,
            targets: Vec::new(),
        }
    }
}

/// Blockers and spell responses for an opposing attack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPlan {
    /// (own board card, opposing attacker) pairs
    pub assignments: Vec<(CardId, CardId)>,
    /// Spells cast after the blockers are placed
    pub spells: Vec<PlayChoice>,
}

/// Decision maker driven by the orchestrator.
pub trait Strategy: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    /// Cards to replace out of the mulligan candidates.
    fn mulligan(&self, candidates: &[&CardRecord]) -> Vec<CardId>;

    /// Which playable card to play, if any.
    ///
    /// `playable` is sorted most expensive first.
    fn play_hand_card(&self, view: &GameView<'_>, playable: &[&CardRecord]) -> Option<PlayChoice>;

    /// Blockers for the current opposing attack.
    fn block(&self, view: &GameView<'_>) -> BlockPlan;

    /// What to do while defending.
    fn respond_to_opponent_action(&self, view: &GameView<'_>) -> GameplayAction;

    /// What to do while holding the attack token.
    fn attack_token_usage(&self, view: &GameView<'_>) -> GameplayAction;

    /// Board cards to send in, in order.
    fn attack(&self, view: &GameView<'_>, board: &[&CardRecord]) -> Vec<CardId>;
}
