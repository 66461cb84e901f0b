//! Attack/health recognition.
//!
//! The digits on a card are drawn in one of a few colors (white when
//! unchanged, green when buffed, red when damaged). Each color hypothesis
//! yields a binary mask; every non-empty mask goes to the digit recognizer
//! and the most confident answer wins.

use image::imageops::{self, FilterType};
use image::GrayImage;
use lorbot_capture::Frame;
use lorbot_core::{CardRecord, CardStats, NamedHsvRange, StatsCalibration};
use std::sync::Arc;
use tracing::trace;

use crate::locator::ComponentLocator;

/// A recognized number with its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitReading {
    /// Recognized value
    pub value: i32,
    /// Recognizer confidence, higher is better
    pub confidence: f32,
}

/// Digit/number recognizer over a square binary mask.
pub trait DigitRecognizer: Send + Sync {
    /// Read a number from `mask`, `None` when nothing is recognized.
    fn recognize(&self, mask: &GrayImage) -> Option<DigitReading>;
}

/// Recognizer that never reads anything.
///
/// Cards keep their catalog stats when no real recognizer is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecognizer;

impl DigitRecognizer for NoopRecognizer {
    fn recognize(&self, _mask: &GrayImage) -> Option<DigitReading> {
        None
    }
}

/// Reads attack and health numbers off card crops.
#[derive(Clone)]
pub struct StatsReader {
    hypotheses: Vec<NamedHsvRange>,
    recognizer_size: u32,
    recognizer: Arc<dyn DigitRecognizer>,
}

impl StatsReader {
    /// Create a reader with calibrated hypotheses.
    pub fn new(calibration: StatsCalibration, recognizer: Arc<dyn DigitRecognizer>) -> Self {
        Self {
            hypotheses: calibration.hypotheses,
            recognizer_size: calibration.recognizer_size.max(1),
            recognizer,
        }
    }

    /// Read one number from a cropped region.
    pub fn read_number(&self, crop: &Frame) -> Option<DigitReading> {
        let mut best: Option<DigitReading> = None;

        for hypothesis in &self.hypotheses {
            let mask = crop.hsv_mask(&hypothesis.range);
            if mask.pixels().all(|px| px.0[0] == 0) {
                continue;
            }

            let resized = imageops::resize(
                &mask,
                self.recognizer_size,
                self.recognizer_size,
                FilterType::Triangle,
            );
            let Some(reading) = self.recognizer.recognize(&resized) else {
                continue;
            };
            trace!(
                hypothesis = %hypothesis.name,
                value = reading.value,
                confidence = reading.confidence,
                "Stat hypothesis read"
            );

            if best.map_or(true, |b| reading.confidence > b.confidence) {
                best = Some(reading);
            }
        }

        best
    }

    /// Read both stats of a card. `None` unless both numbers are read.
    pub fn read_card(
        &self,
        frame: &Frame,
        locator: &ComponentLocator,
        card: &CardRecord,
    ) -> Option<CardStats> {
        let (attack_rect, health_rect) = locator.stat_rects(card);
        let attack = self.read_number(&frame.crop(attack_rect)?)?;
        let health = self.read_number(&frame.crop(health_rect)?)?;
        Some(CardStats {
            attack: attack.value,
            health: health.value,
        })
    }
}

impl std::fmt::Debug for StatsReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsReader")
            .field("hypotheses", &self.hypotheses.len())
            .field("recognizer_size", &self.recognizer_size)
            .finish()
    }
}
