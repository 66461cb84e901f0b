//! Opponent attack awaiting blockers.

use lorbot_core::{Phase, Zone};

use crate::phase::{PhaseContext, PhaseRule};

/// Claims [`Phase::Blocking`] when opposing cards stand in the attack lane.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingRule;

impl PhaseRule for BlockingRule {
    fn name(&self) -> &'static str {
        "blocking"
    }

    fn priority(&self) -> u32 {
        60
    }

    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase> {
        if context.snapshot.zone_len(Zone::OpponentAttackOrBlock) == 0 {
            return None;
        }

        Some(if context.can_interact() {
            Phase::Blocking
        } else {
            Phase::UserInteractNotReady
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixture::{Inputs, SIZE};
    use crate::testing::{self, card, raw, telemetry_y, FrameBuilder};
    use lorbot_core::CardRecord;
    use std::sync::Arc;

    fn with_attacker(frame: lorbot_capture::Frame) -> Inputs {
        let mut inputs = Inputs::new(frame, testing::positions(SIZE, vec![]));
        let y = telemetry_y(Zone::OpponentAttackOrBlock, SIZE.height);
        let record = CardRecord::new(
            Arc::new(card("01NX020", 1, 3, 2)),
            &raw(21, "01NX020", 900, y, false),
            SIZE.height,
            Zone::OpponentAttackOrBlock,
        );
        inputs.snapshot.insert(record);
        inputs
    }

    #[test]
    fn test_blocking_when_ready() {
        let inputs = with_attacker(FrameBuilder::new(SIZE).turn_ready().build());
        assert_eq!(BlockingRule.evaluate(&inputs.context()), Some(Phase::Blocking));
    }

    #[test]
    fn test_not_ready_without_turn_button() {
        let inputs = with_attacker(FrameBuilder::new(SIZE).build());
        assert_eq!(
            BlockingRule.evaluate(&inputs.context()),
            Some(Phase::UserInteractNotReady)
        );
    }

    #[test]
    fn test_passes_without_attackers() {
        let inputs = Inputs::new(
            FrameBuilder::new(SIZE).turn_ready().build(),
            testing::positions(SIZE, vec![]),
        );
        assert_eq!(BlockingRule.evaluate(&inputs.context()), None);
    }
}
