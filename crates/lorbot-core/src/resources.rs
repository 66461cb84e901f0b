//! Mana counters.

use serde::{Deserialize, Serialize};

/// Highest spell mana the board can show.
pub const MAX_SPELL_MANA: u8 = 3;

/// Mana and spell mana read from the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Mana in `0..=10`, or -1 when unrecognized this poll
    pub mana: i32,
    /// Spell mana in `0..=3`
    pub spell_mana: u8,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self {
            mana: 0,
            spell_mana: 0,
        }
    }
}

impl ResourceState {
    /// Mana value meaning "not recognized".
    pub const UNKNOWN_MANA: i32 = -1;

    /// Whether the mana reading failed this poll.
    pub fn mana_unknown(&self) -> bool {
        self.mana < 0
    }

    /// Whether a card of `cost` can be paid for.
    ///
    /// Spells may additionally draw on spell mana.
    pub fn can_afford(&self, cost: i32, is_spell: bool) -> bool {
        if cost <= self.mana {
            return true;
        }
        is_spell && cost <= self.mana + self.spell_mana as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_afford_units() {
        let res = ResourceState {
            mana: 3,
            spell_mana: 2,
        };
        assert!(res.can_afford(3, false));
        assert!(!res.can_afford(4, false));
    }

    #[test]
    fn test_spells_use_spell_mana() {
        let res = ResourceState {
            mana: 3,
            spell_mana: 2,
        };
        assert!(res.can_afford(5, true));
        assert!(!res.can_afford(6, true));
    }

    #[test]
    fn test_unknown_mana() {
        let res = ResourceState {
            mana: ResourceState::UNKNOWN_MANA,
            spell_mana: 0,
        };
        assert!(res.mana_unknown());
        assert!(res.can_afford(-1, false));
        assert!(!res.can_afford(0, true));
    }
}
