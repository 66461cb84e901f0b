//! Turn ownership.

use lorbot_core::Phase;

use crate::phase::{PhaseContext, PhaseRule};

/// Claims [`Phase::OpponentTurn`] while the turn button is dark.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpponentTurnRule;

impl PhaseRule for OpponentTurnRule {
    fn name(&self) -> &'static str {
        "opponent_turn"
    }

    fn priority(&self) -> u32 {
        50
    }

    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase> {
        (!context.can_interact()).then_some(Phase::OpponentTurn)
    }
}

/// Claims [`Phase::AttackTurn`] when the attack token is shown.
///
/// Each configured color range is checked on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackTokenRule;

impl PhaseRule for AttackTokenRule {
    fn name(&self) -> &'static str {
        "attack_token"
    }

    fn priority(&self) -> u32 {
        40
    }

    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase> {
        let threshold = context.calibration.attack_token_threshold;
        context
            .attack_token_pixels()
            .into_iter()
            .any(|count| count > threshold)
            .then_some(Phase::AttackTurn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixture::{Inputs, SIZE};
    use crate::testing::{self, FrameBuilder};

    fn inputs(builder: FrameBuilder) -> Inputs {
        Inputs::new(builder.build(), testing::positions(SIZE, vec![]))
    }

    #[test]
    fn test_dark_button_is_opponent_turn() {
        let dark = inputs(FrameBuilder::new(SIZE));
        assert_eq!(
            OpponentTurnRule.evaluate(&dark.context()),
            Some(Phase::OpponentTurn)
        );

        let lit = inputs(FrameBuilder::new(SIZE).turn_ready());
        assert_eq!(OpponentTurnRule.evaluate(&lit.context()), None);
    }

    #[test]
    fn test_attack_token() {
        let token = inputs(FrameBuilder::new(SIZE).attack_token());
        assert_eq!(AttackTokenRule.evaluate(&token.context()), Some(Phase::AttackTurn));

        let none = inputs(FrameBuilder::new(SIZE));
        assert_eq!(AttackTokenRule.evaluate(&none.context()), None);
    }
}
