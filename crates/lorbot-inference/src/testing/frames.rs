//! Synthetic frame painting.

use image::{Rgb, RgbImage};
use lorbot_capture::Frame;
use lorbot_core::{Rect, RegionCalibration, Size};

use crate::locator::ComponentLocator;

/// Turn button color when the local player may act.
pub const TURN_READY: Rgb<u8> = Rgb([0, 0, 255]);
/// Idle rounds log color.
pub const ROUNDS_LOG: Rgb<u8> = Rgb([155, 143, 85]);
/// Attack token color.
pub const ATTACK_TOKEN: Rgb<u8> = Rgb([255, 140, 0]);
/// Deck-edit button color.
pub const DECK_EDIT: Rgb<u8> = Rgb([200, 151, 102]);
/// Lit spell mana indicator color.
pub const SPELL_MANA: Rgb<u8> = Rgb([0, 0, 255]);

/// Paints probe regions onto a black frame.
///
/// ```
/// use lorbot_core::Size;
/// use lorbot_inference::testing::FrameBuilder;
///
/// let frame = FrameBuilder::new(Size::new(1920, 1080))
///     .rounds_log_idle()
///     .turn_ready()
///     .build();
/// assert_eq!(frame.size(), Size::new(1920, 1080));
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    image: RgbImage,
    locator: ComponentLocator,
}

impl FrameBuilder {
    /// Black frame with the default regions.
    pub fn new(size: Size) -> Self {
        Self::with_regions(size, RegionCalibration::default())
    }

    /// Black frame with custom regions.
    pub fn with_regions(size: Size, regions: RegionCalibration) -> Self {
        Self {
            image: RgbImage::new(size.width, size.height),
            locator: ComponentLocator::new(size, regions),
        }
    }

    /// Fill a rectangle, clipped to the frame.
    pub fn fill(mut self, rect: Rect, color: Rgb<u8>) -> Self {
        let size = Size::new(self.image.width(), self.image.height());
        if let Some(clipped) = rect.clamp_to(size) {
            for y in clipped.y as u32..clipped.bottom() as u32 {
                for x in clipped.x as u32..clipped.right() as u32 {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
        self
    }

    /// Turn button lit: the local player may act.
    pub fn turn_ready(self) -> Self {
        let rect = self.locator.turn_button_rect();
        self.fill(rect, TURN_READY)
    }

    /// Rounds log fully visible: the client is not busy.
    pub fn rounds_log_idle(self) -> Self {
        let rect = self.locator.rounds_log_rect();
        self.fill(rect, ROUNDS_LOG)
    }

    /// Attack token shown.
    pub fn attack_token(self) -> Self {
        let rect = self.locator.attack_token_rect();
        self.fill(rect, ATTACK_TOKEN)
    }

    /// Deck builder showing a selected deck.
    pub fn deck_selected(self) -> Self {
        let rect = self.locator.deck_edit_rect();
        self.fill(rect, DECK_EDIT)
    }

    /// Light the first `count` spell mana indicators.
    pub fn spell_mana(self, count: usize) -> Self {
        let rects = self.locator.spell_mana_rects();
        rects
            .into_iter()
            .take(count)
            .fold(self, |builder, rect| builder.fill(rect, SPELL_MANA))
    }

    /// Finish the frame.
    pub fn build(self) -> Frame {
        Frame::new(self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorbot_core::PhaseCalibration;

    #[test]
    fn test_painted_regions_hit_probes() {
        let size = Size::new(1920, 1080);
        let locator = ComponentLocator::new(size, RegionCalibration::default());
        let phase = PhaseCalibration::default();
        let frame = FrameBuilder::new(size)
            .turn_ready()
            .rounds_log_idle()
            .attack_token()
            .deck_selected()
            .build();

        let turn = frame.count_in_hsv_region(locator.turn_button_rect(), &phase.turn_ready_range);
        assert!(turn > phase.turn_ready_threshold);

        let rounds = frame.count_in_hsv_region(locator.rounds_log_rect(), &phase.rounds_log_range);
        assert!(rounds >= phase.rounds_log_idle_threshold);

        let token = frame.count_in_hsv_region(
            locator.attack_token_rect(),
            &phase.attack_token_ranges[0],
        );
        assert!(token > phase.attack_token_threshold);

        let deck = frame.count_in_hsv_region(locator.deck_edit_rect(), &phase.deck_edit_range);
        assert!(deck > phase.deck_edit_threshold);
    }

    #[test]
    fn test_black_frame_hits_nothing() {
        let size = Size::new(1920, 1080);
        let locator = ComponentLocator::new(size, RegionCalibration::default());
        let phase = PhaseCalibration::default();
        let frame = FrameBuilder::new(size).build();

        assert_eq!(
            frame.count_in_hsv_region(locator.turn_button_rect(), &phase.turn_ready_range),
            0
        );
        assert_eq!(
            frame.count_in_hsv_region(locator.rounds_log_rect(), &phase.rounds_log_range),
            0
        );
    }
}
