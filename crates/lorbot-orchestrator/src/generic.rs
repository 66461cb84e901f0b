//! Default strategy.

use lorbot_core::{CardId, CardRecord, Keyword, Zone};

use crate::strategy::{is_lane_taken, BlockPlan, GameView, GameplayAction, PlayChoice, Strategy};

/// Cards costing more than this are mulliganed away.
pub const MULLIGAN_MAX_COST: i32 = 3;

/// Opposing cards need this much attack to be blocked when fearsome.
pub const FEARSOME_MIN_ATTACK: i32 = 3;

/// Prefix of descriptions for cards with a play condition.
const PLAY_CONDITION_PREFIX: &str = "To play me";

/// Marker of cards that support their neighbour when attacking.
const SUPPORT_MARKER: &str = "Support:";

/// Plays the hardest hitting unit it can, blocks what it safely can and
/// attacks with everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStrategy;

impl Strategy for GenericStrategy {
    fn name(&self) -> &str {
        "generic"
    }

    fn mulligan(&self, candidates: &[&CardRecord]) -> Vec<CardId> {
        candidates
            .iter()
            .filter(|card| card.cost() > MULLIGAN_MAX_COST)
            .map(|card| card.id())
            .collect()
    }

    fn play_hand_card(&self, view: &GameView<'_>, playable: &[&CardRecord]) -> Option<PlayChoice> {
        let mana = view.resources.mana;
        playable
            .iter()
            .filter(|card| !card.is_spell())
            .filter(|card| {
                card.cost() <= mana && !card.attrs().description.starts_with(PLAY_CONDITION_PREFIX)
            })
            // First of equal attacks
            .fold(None::<&&CardRecord>, |best, card| match best {
                Some(b) if b.attack() >= card.attack() => Some(b),
                _ => Some(card),
            })
            .map(|card| PlayChoice::untargeted(card.id()))
    }

    fn block(&self, view: &GameView<'_>) -> BlockPlan {
        let lane = view.zone(Zone::AttackOrBlock);
        let opponents = view.zone(Zone::OpponentAttackOrBlock);
        let mut plan = BlockPlan::default();
        let mut next_opponent = 0;

        for own in view.zone(Zone::Board) {
            let start = next_opponent.min(opponents.len());
            for opponent in &opponents[start..] {
                if is_lane_taken(&lane, opponent) {
                    next_opponent += 1;
                    continue;
                }
                if opponent.has_keyword(Keyword::Elusive) && !own.has_keyword(Keyword::Elusive) {
                    continue;
                }
                if opponent.has_keyword(Keyword::Fearsome) && own.attack() < FEARSOME_MIN_ATTACK {
                    continue;
                }
                if own.has_keyword(Keyword::CantBlock) {
                    continue;
                }

                plan.assignments.push((own.id(), opponent.id()));
                next_opponent += 1;
                break;
            }
        }

        plan
    }

    fn respond_to_opponent_action(&self, _view: &GameView<'_>) -> GameplayAction {
        GameplayAction::PlayCards
    }

    fn attack_token_usage(&self, view: &GameView<'_>) -> GameplayAction {
        if view.snapshot.zone_len(Zone::OpponentBoard) == 0 {
            GameplayAction::Attack
        } else {
            GameplayAction::PlayCards
        }
    }

    fn attack(&self, _view: &GameView<'_>, board: &[&CardRecord]) -> Vec<CardId> {
        let mut order = board.to_vec();
        order.sort_by_key(|card| {
            (
                card.attrs().description.contains(SUPPORT_MARKER),
                card.attack(),
            )
        });
        order.into_iter().map(|card| card.id()).collect()
    }
}
