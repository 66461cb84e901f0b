//! Mana and spell mana readers.
//!
//! Mana is read by matching the edge map of the mana counter against one
//! weighted template per value. Spell mana is the number of lit indicator
//! gems, counted left to right.

use image::GrayImage;
use lorbot_capture::Frame;
use lorbot_core::{Error, HsvRange, Rect, ResourceCalibration, Result, MAX_SPELL_MANA};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, trace};

/// Edge template for one mana value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaTemplate {
    /// Mana value the template stands for
    pub value: i32,
    /// Row-major weights, 0-255
    pub weights: Vec<Vec<u8>>,
}

impl ManaTemplate {
    /// Build a template from an edge map, using pixel values as weights.
    pub fn from_edges(value: i32, edges: &GrayImage) -> Self {
        let weights = edges
            .rows()
            .map(|row| row.map(|px| px.0[0]).collect())
            .collect();
        Self { value, weights }
    }

    fn validate(&self) -> Result<()> {
        let width = self.weights.first().map_or(0, Vec::len);
        if width == 0 || self.weights.iter().any(|row| row.len() != width) {
            return Err(Error::Config(format!(
                "mana template {} must be a non-empty rectangle",
                self.value
            )));
        }
        Ok(())
    }

    /// Weighted share of template pixels present in `edges`, in `[0, 1]`.
    ///
    /// Template pixels outside `edges` count as missing.
    pub fn score(&self, edges: &GrayImage) -> f64 {
        let mut matched: u64 = 0;
        let mut total: u64 = 0;

        for (y, row) in self.weights.iter().enumerate() {
            for (x, &weight) in row.iter().enumerate() {
                if weight == 0 {
                    continue;
                }
                total += weight as u64;
                if let Some(px) = edges.get_pixel_checked(x as u32, y as u32) {
                    matched += px.0[0] as u64 * weight as u64;
                }
            }
        }

        if total == 0 {
            return 0.0;
        }
        matched as f64 / (255.0 * total as f64)
    }
}

/// The set of mana templates, tried in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaTemplates {
    /// Templates in evaluation order
    pub templates: Vec<ManaTemplate>,
}

impl ManaTemplates {
    /// Load templates from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let templates: Self = serde_json::from_str(&content)?;
        for template in &templates.templates {
            template.validate()?;
        }
        Ok(templates)
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template is loaded.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// An accepted mana match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManaReading {
    /// Mana value
    pub value: i32,
    /// Match ratio of the winning template
    pub ratio: f64,
}

/// Reads the mana counter through edge template matching.
#[derive(Debug, Clone)]
pub struct ManaReader {
    templates: ManaTemplates,
    accept_ratio: f64,
    edge_threshold: f32,
}

impl ManaReader {
    /// Create a reader.
    pub fn new(templates: ManaTemplates, calibration: &ResourceCalibration) -> Self {
        Self {
            templates,
            accept_ratio: calibration.mana_accept_ratio,
            edge_threshold: calibration.edge_threshold,
        }
    }

    /// Loaded templates.
    pub fn templates(&self) -> &ManaTemplates {
        &self.templates
    }

    /// Best template above the acceptance ratio; the first one wins ties.
    pub fn score_edges(&self, edges: &GrayImage) -> Option<ManaReading> {
        let mut best: Option<ManaReading> = None;
        for template in &self.templates.templates {
            let ratio = template.score(edges);
            trace!(value = template.value, ratio, "Mana template scored");
            if ratio > self.accept_ratio && best.map_or(true, |b| ratio > b.ratio) {
                best = Some(ManaReading {
                    value: template.value,
                    ratio,
                });
            }
        }
        best
    }

    /// Read mana from one frame.
    pub fn read_frame(&self, frame: &Frame, rect: Rect) -> Option<ManaReading> {
        let crop = frame.crop(rect)?;
        self.score_edges(&crop.edges(self.edge_threshold))
    }

    /// Read mana from a burst of frames, keeping the best match.
    pub fn read(&self, frames: &[Frame], rect: Rect) -> Option<ManaReading> {
        let mut best: Option<ManaReading> = None;
        for frame in frames {
            if let Some(reading) = self.read_frame(frame, rect) {
                if best.map_or(true, |b| reading.ratio > b.ratio) {
                    best = Some(reading);
                }
            }
        }
        debug!(mana = ?best.map(|b| b.value), "Mana read");
        best
    }
}

/// Counts lit spell mana indicators.
#[derive(Debug, Clone)]
pub struct SpellManaReader {
    range: HsvRange,
    threshold: u32,
}

impl SpellManaReader {
    /// Create a reader.
    pub fn new(calibration: &ResourceCalibration) -> Self {
        Self {
            range: calibration.spell_mana_range,
            threshold: calibration.spell_mana_threshold,
        }
    }

    /// Lit indicators from the left, stopping at the first dark one.
    pub fn read(&self, frame: &Frame, indicators: &[Rect]) -> u8 {
        let lit = indicators
            .iter()
            .take_while(|rect| frame.count_in_hsv_region(**rect, &self.range) > self.threshold)
            .count();
        (lit as u8).min(MAX_SPELL_MANA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use lorbot_capture::frame::sobel_edges;

    /// 50x37 frame with a white box outline drawn at `inset`.
    fn boxed(inset: u32) -> Frame {
        let mut image = RgbImage::new(50, 37);
        for y in inset..37 - inset {
            for x in inset..50 - inset {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        Frame::new(image)
    }

    fn reader(templates: Vec<ManaTemplate>) -> ManaReader {
        ManaReader::new(ManaTemplates { templates }, &ResourceCalibration::default())
    }

    fn edges_of(frame: &Frame) -> GrayImage {
        sobel_edges(&frame.gray(), 100.0)
    }

    #[test]
    fn test_exact_template_matches() {
        let three = boxed(8);
        let reader = reader(vec![
            ManaTemplate::from_edges(1, &edges_of(&boxed(14))),
            ManaTemplate::from_edges(3, &edges_of(&three)),
        ]);

        let reading = reader.score_edges(&edges_of(&three)).unwrap();
        assert_eq!(reading.value, 3);
        assert!((reading.ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_template_wins_ties() {
        let edges = edges_of(&boxed(8));
        let reader = reader(vec![
            ManaTemplate::from_edges(4, &edges),
            ManaTemplate::from_edges(7, &edges),
        ]);
        assert_eq!(reader.score_edges(&edges).unwrap().value, 4);
    }

    #[test]
    fn test_below_acceptance_is_unknown() {
        let reader = reader(vec![ManaTemplate {
            value: 5,
            weights: vec![vec![255; 50]; 37],
        }]);
        assert!(reader.score_edges(&edges_of(&boxed(8))).is_none());
        assert!(reader.read(&[boxed(8)], Rect::new(0, 0, 50, 37)).is_none());
    }

    #[test]
    fn test_read_over_frames() {
        let reader = reader(vec![ManaTemplate::from_edges(2, &edges_of(&boxed(8)))]);
        let frames = vec![Frame::new(RgbImage::new(50, 37)), boxed(8)];
        let reading = reader.read(&frames, Rect::new(0, 0, 50, 37)).unwrap();
        assert_eq!(reading.value, 2);
    }

    #[test]
    fn test_load_rejects_ragged_template() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("mana.json");
        std::fs::write(&path, r#"{"templates":[{"value":0,"weights":[[255,0],[255]]}]}"#)
            .unwrap();
        assert!(matches!(ManaTemplates::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"templates":[{"value":0,"weights":[[255,0],[0,255]]}]}"#)
            .unwrap();
        assert_eq!(ManaTemplates::load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_spell_mana_stops_at_first_dark() {
        let mut image = RgbImage::new(60, 10);
        let blue = Rgb([0, 0, 255]);
        for y in 0..10 {
            for x in (0..10).chain(40..50) {
                image.put_pixel(x, y, blue);
            }
        }
        let frame = Frame::new(image);
        let reader = SpellManaReader::new(&ResourceCalibration::default());

        let rects = [
            Rect::new(0, 0, 10, 10),
            Rect::new(20, 0, 10, 10),
            Rect::new(40, 0, 10, 10),
        ];
        assert_eq!(reader.read(&frame, &rects), 1);
        assert_eq!(reader.read(&frame, &rects[1..]), 0);
    }

    #[test]
    fn test_spell_mana_caps_at_three() {
        let frame = Frame::new(RgbImage::from_pixel(100, 10, Rgb([0, 0, 255])));
        let reader = SpellManaReader::new(&ResourceCalibration::default());
        let rects: Vec<Rect> = (0..4).map(|i| Rect::new(i * 20, 0, 10, 10)).collect();
        assert_eq!(reader.read(&frame, &rects), 3);
    }
}
