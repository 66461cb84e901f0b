//! Operator hold.

use lorbot_core::Phase;

use crate::phase::{PhaseContext, PhaseRule};

/// Claims [`Phase::Hold`] while the operator has paused the bot.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldRule;

impl PhaseRule for HoldRule {
    fn name(&self) -> &'static str {
        "hold"
    }

    fn priority(&self) -> u32 {
        100
    }

    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase> {
        context.paused.then_some(Phase::Hold)
    }
}
