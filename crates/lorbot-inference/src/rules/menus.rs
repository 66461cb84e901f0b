//! Menu context: deck selection and match end.

use lorbot_core::Phase;

use crate::phase::{PhaseContext, PhaseRule};

/// Claims the menu phases when telemetry reports the menu context.
///
/// A lit deck-edit button means a deck is selected. Otherwise a match result
/// newer than the last counted one means a match has just ended.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenusRule;

impl PhaseRule for MenusRule {
    fn name(&self) -> &'static str {
        "menus"
    }

    fn priority(&self) -> u32 {
        90
    }

    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase> {
        if !context.positions.in_menus() {
            return None;
        }

        if context.deck_edit_pixels() > context.calibration.deck_edit_threshold {
            return Some(Phase::MenusDeckSelected);
        }

        let finished = context
            .match_result
            .is_some_and(|result| result.game_id > context.last_game_id);
        if finished {
            return Some(Phase::End);
        }

        Some(Phase::Menus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixture::{Inputs, SIZE};
    use crate::testing::{self, FrameBuilder};
    use lorbot_core::{CardPositions, MatchResult};

    fn menus() -> CardPositions {
        CardPositions {
            game_state: "Menus".into(),
            ..CardPositions::default()
        }
    }

    fn result(game_id: i64) -> Option<MatchResult> {
        Some(MatchResult {
            game_id,
            local_player_won: true,
        })
    }

    #[test]
    fn test_ignored_in_match() {
        let inputs = Inputs::new(
            FrameBuilder::new(SIZE).deck_selected().build(),
            testing::positions(SIZE, vec![]),
        );
        assert_eq!(MenusRule.evaluate(&inputs.context()), None);
    }

    #[test]
    fn test_deck_selected() {
        let inputs = Inputs::new(FrameBuilder::new(SIZE).deck_selected().build(), menus());
        let context = inputs.context().with_match_result(result(4));
        assert_eq!(MenusRule.evaluate(&context), Some(Phase::MenusDeckSelected));
    }

    #[test]
    fn test_new_result_is_end() {
        let inputs = Inputs::new(FrameBuilder::new(SIZE).build(), menus());

        let fresh = inputs.context().with_match_result(result(4)).with_last_game_id(3);
        assert_eq!(MenusRule.evaluate(&fresh), Some(Phase::End));

        let seen = inputs.context().with_match_result(result(4)).with_last_game_id(4);
        assert_eq!(MenusRule.evaluate(&seen), Some(Phase::Menus));

        assert_eq!(MenusRule.evaluate(&inputs.context()), Some(Phase::Menus));
    }
}
