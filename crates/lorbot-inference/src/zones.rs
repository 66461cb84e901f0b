//! Zone classification of telemetry rectangles.
//!
//! Telemetry reports y bottom-up, so `(H - y) / H` grows towards the bottom
//! of the window: the local hand sits highest, the opposing hand lowest.

use lorbot_core::{RawRectangle, Zone, ZoneCalibration};

/// Assigns a [`Zone`] to a rectangle from its vertical position.
#[derive(Debug, Clone, Default)]
pub struct ZoneClassifier {
    calibration: ZoneCalibration,
}

impl ZoneClassifier {
    /// Create a classifier from calibrated cutoffs.
    pub fn new(calibration: ZoneCalibration) -> Self {
        Self { calibration }
    }

    /// Calibrated cutoffs.
    pub fn calibration(&self) -> &ZoneCalibration {
        &self.calibration
    }

    /// Classify a rectangle for a window `window_height` pixels tall.
    ///
    /// The mulligan shelf is checked before the bands; everything below the
    /// last band falls back to the opposing hand.
    pub fn classify(&self, raw: &RawRectangle, window_height: u32) -> Zone {
        let ratio = height_ratio(raw, window_height);

        if self.is_on_shelf(raw, window_height) {
            return Zone::Mulligan;
        }

        self.calibration
            .bands
            .iter()
            .find(|band| ratio > band.above)
            .map(|band| band.zone)
            .unwrap_or(self.calibration.fallback)
    }

    /// Whether a rectangle sits on the mulligan shelf.
    pub fn is_on_shelf(&self, raw: &RawRectangle, window_height: u32) -> bool {
        if window_height == 0 {
            return false;
        }

        let shelf = window_height as f32 * self.calibration.mulligan_shelf;
        height_ratio(raw, window_height) > self.calibration.mulligan_min_ratio
            && (raw.top_left_y as f32 - shelf).abs() < self.calibration.mulligan_tolerance_px
    }

    /// Whether every local, non-nexus rectangle is on the shelf.
    ///
    /// False when there is no such rectangle at all.
    pub fn local_hand_on_shelf(&self, rectangles: &[RawRectangle], window_height: u32) -> bool {
        let mut local = rectangles
            .iter()
            .filter(|r| r.local_player && !r.is_nexus())
            .peekable();

        local.peek().is_some() && local.all(|r| self.is_on_shelf(r, window_height))
    }
}

fn height_ratio(raw: &RawRectangle, window_height: u32) -> f32 {
    if window_height == 0 {
        return 0.0;
    }
    let h = window_height as f32;
    (h - raw.top_left_y as f32) / h
}
