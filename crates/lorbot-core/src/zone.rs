//! Symbolic board zones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board zone a card rectangle sits in.
///
/// Local zones come first, then the shared spell stack, then the opponent's
/// zones ordered from the middle of the board to the top of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Local hand
    Hand,
    /// Local back row
    Board,
    /// Local attack/block lane
    AttackOrBlock,
    /// Cards offered for replacement at match start
    Mulligan,
    /// Shared spell/ability stack
    SpellStack,
    /// Opponent attack/block lane
    OpponentAttackOrBlock,
    /// Opponent back row
    OpponentBoard,
    /// Opponent hand
    OpponentHand,
}

impl Zone {
    /// Every zone, in bucket order.
    pub const ALL: [Zone; 8] = [
        Zone::Hand,
        Zone::Board,
        Zone::AttackOrBlock,
        Zone::Mulligan,
        Zone::SpellStack,
        Zone::OpponentAttackOrBlock,
        Zone::OpponentBoard,
        Zone::OpponentHand,
    ];

    /// Bucket index of this zone.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether attack/health are read from the screen for cards in this zone.
    pub fn reads_stats(self) -> bool {
        matches!(
            self,
            Zone::Board | Zone::AttackOrBlock | Zone::OpponentBoard | Zone::OpponentAttackOrBlock
        )
    }

    /// Whether the zone is on the opponent's side of the board.
    pub fn is_opponent_side(self) -> bool {
        matches!(
            self,
            Zone::OpponentAttackOrBlock | Zone::OpponentBoard | Zone::OpponentHand
        )
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::Hand => "hand",
            Zone::Board => "board",
            Zone::AttackOrBlock => "attack_or_block",
            Zone::Mulligan => "mulligan",
            Zone::SpellStack => "spell_stack",
            Zone::OpponentAttackOrBlock => "opponent_attack_or_block",
            Zone::OpponentBoard => "opponent_board",
            Zone::OpponentHand => "opponent_hand",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_indices_match_all() {
        for (i, zone) in Zone::ALL.iter().enumerate() {
            assert_eq!(zone.index(), i);
        }
    }

    #[test]
    fn test_stat_zones() {
        let reading: Vec<Zone> = Zone::ALL.iter().copied().filter(|z| z.reads_stats()).collect();
        assert_eq!(
            reading,
            vec![
                Zone::Board,
                Zone::AttackOrBlock,
                Zone::OpponentAttackOrBlock,
                Zone::OpponentBoard
            ]
        );
    }

    #[test]
    fn test_zone_serde_names() {
        let yaml = serde_yaml::to_string(&Zone::OpponentAttackOrBlock).unwrap();
        assert_eq!(yaml.trim(), "opponent_attack_or_block");
        assert_eq!(Zone::SpellStack.to_string(), "spell_stack");
    }
}
