//! Discrete game phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Game phase inferred from one poll.
///
/// This is a classifier output recomputed every tick, not a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing inferred yet
    #[default]
    None,
    /// Paused by the operator
    Hold,
    /// Main menus, no deck selected
    Menus,
    /// Deck builder open with a deck selected
    MenusDeckSelected,
    /// Waiting for matchmaking
    SearchGame,
    /// Something is animating or the client is busy
    UserInteractNotReady,
    /// Mulligan screen
    Mulligan,
    /// Opponent is acting
    OpponentTurn,
    /// Local player acts without the attack token
    DefendTurn,
    /// Local player acts holding the attack token
    AttackTurn,
    /// Local attack is resolving
    Attacking,
    /// Opponent attacked and blockers must be assigned
    Blocking,
    /// A match has just finished
    End,
}

impl Phase {
    /// Whether the local player is expected to act in this phase.
    pub fn is_local_turn(self) -> bool {
        matches!(
            self,
            Phase::Attacking | Phase::Blocking | Phase::AttackTurn | Phase::DefendTurn
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::None => "None",
            Phase::Hold => "Hold",
            Phase::Menus => "Menus",
            Phase::MenusDeckSelected => "MenusDeckSelected",
            Phase::SearchGame => "SearchGame",
            Phase::UserInteractNotReady => "UserInteractNotReady",
            Phase::Mulligan => "Mulligan",
            Phase::OpponentTurn => "OpponentTurn",
            Phase::DefendTurn => "DefendTurn",
            Phase::AttackTurn => "AttackTurn",
            Phase::Attacking => "Attacking",
            Phase::Blocking => "Blocking",
            Phase::End => "End",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_turn_phases() {
        assert!(Phase::DefendTurn.is_local_turn());
        assert!(Phase::Blocking.is_local_turn());
        assert!(Phase::Attacking.is_local_turn());
        assert!(!Phase::Mulligan.is_local_turn());
        assert!(!Phase::OpponentTurn.is_local_turn());
        assert!(!Phase::Hold.is_local_turn());
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::MenusDeckSelected.to_string(), "MenusDeckSelected");
        assert_eq!(Phase::default(), Phase::None);
    }
}
