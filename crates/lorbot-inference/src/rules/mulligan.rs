//! Mulligan screen.

use lorbot_core::Phase;

use crate::phase::{PhaseContext, PhaseRule};

/// Claims [`Phase::Mulligan`] when the whole local hand sits on the shelf.
///
/// Until the turn button lights up the client is not ready for input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MulliganRule;

impl PhaseRule for MulliganRule {
    fn name(&self) -> &'static str {
        "mulligan"
    }

    fn priority(&self) -> u32 {
        70
    }

    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase> {
        let height = context.locator.size().height;
        if !context
            .classifier
            .local_hand_on_shelf(&context.positions.rectangles, height)
        {
            return None;
        }

        Some(if context.can_interact() {
            Phase::Mulligan
        } else {
            Phase::UserInteractNotReady
        })
    }
}
