//! Client busy detection through the rounds log.

use lorbot_core::Phase;

use crate::phase::{PhaseContext, PhaseRule};

/// Claims [`Phase::UserInteractNotReady`] while the rounds log is hidden.
///
/// The log is partly covered while an action resolves; that narrow pixel
/// band is not treated as busy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyRule;

impl PhaseRule for BusyRule {
    fn name(&self) -> &'static str {
        "busy"
    }

    fn priority(&self) -> u32 {
        80
    }

    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase> {
        let pixels = context.rounds_log_pixels();
        let in_action = context.calibration.rounds_log_in_action.contains(pixels);

        (!in_action && pixels < context.calibration.rounds_log_idle_threshold)
            .then_some(Phase::UserInteractNotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::ComponentLocator;
    use crate::rules::fixture::{Inputs, SIZE};
    use crate::testing::{self, FrameBuilder, ROUNDS_LOG};
    use lorbot_core::{Rect, RegionCalibration};

    fn log_rect() -> Rect {
        ComponentLocator::new(SIZE, RegionCalibration::default()).rounds_log_rect()
    }

    /// Paint `rows` full rows plus `extra` pixels of the 64-pixel wide log.
    fn with_log_pixels(rows: u32, extra: u32) -> Inputs {
        let log = log_rect();
        let mut builder = FrameBuilder::new(SIZE);
        if rows > 0 {
            builder = builder.fill(Rect::new(log.x, log.y, log.width, rows), ROUNDS_LOG);
        }
        if extra > 0 {
            builder = builder.fill(Rect::new(log.x, log.y + rows as i32, extra, 1), ROUNDS_LOG);
        }
        Inputs::new(builder.build(), testing::positions(SIZE, vec![]))
    }

    #[test]
    fn test_hidden_log_is_busy() {
        let inputs = with_log_pixels(0, 0);
        assert_eq!(
            BusyRule.evaluate(&inputs.context()),
            Some(Phase::UserInteractNotReady)
        );
    }

    #[test]
    fn test_visible_log_passes() {
        let inputs = Inputs::new(
            FrameBuilder::new(SIZE).rounds_log_idle().build(),
            testing::positions(SIZE, vec![]),
        );
        assert_eq!(BusyRule.evaluate(&inputs.context()), None);
    }

    #[test]
    fn test_in_action_band_passes() {
        assert_eq!(log_rect().width, 64);

        let in_action = with_log_pixels(1, 56);
        assert_eq!(in_action.context().rounds_log_pixels(), 120);
        assert_eq!(BusyRule.evaluate(&in_action.context()), None);

        let partial = with_log_pixels(0, 60);
        assert_eq!(
            BusyRule.evaluate(&partial.context()),
            Some(Phase::UserInteractNotReady)
        );
    }
}
