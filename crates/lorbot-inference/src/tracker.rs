//! Card tracker: reconciles telemetry rectangles with tracked records.

use lorbot_capture::Frame;
use lorbot_core::{BoardSnapshot, CardId, CardRecord, Error, RawRectangle, Result};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::catalog::CardCatalog;
use crate::locator::ComponentLocator;
use crate::stats::StatsReader;
use crate::zones::ZoneClassifier;

/// Rebuilds the [`BoardSnapshot`] from each telemetry poll.
///
/// Records are keyed by card id and survive across polls: a card seen again
/// keeps its record and only moves. Ids missing from a poll are dropped.
#[derive(Clone)]
pub struct CardTracker {
    classifier: ZoneClassifier,
    catalog: Arc<dyn CardCatalog>,
    stats: StatsReader,
}

impl CardTracker {
    /// Create a tracker.
    pub fn new(
        classifier: ZoneClassifier,
        catalog: Arc<dyn CardCatalog>,
        stats: StatsReader,
    ) -> Self {
        Self {
            classifier,
            catalog,
            stats,
        }
    }

    /// Zone classifier in use.
    pub fn classifier(&self) -> &ZoneClassifier {
        &self.classifier
    }

    /// Rebuild `snapshot` from `rectangles`.
    ///
    /// Nexus rectangles are skipped. Attack/health are read from `frame` for
    /// cards in stat-bearing zones; a failed read keeps the previous values.
    /// A card code unknown to the catalog purges the catalog and fails with
    /// [`Error::CatalogMiss`].
    pub fn update(
        &self,
        snapshot: &mut BoardSnapshot,
        rectangles: &[RawRectangle],
        locator: &ComponentLocator,
        frame: Option<&Frame>,
    ) -> Result<()> {
        let height = locator.size().height;
        let mut previous = snapshot.take_records();

        for raw in rectangles.iter().filter(|r| !r.is_nexus()) {
            let zone = self.classifier.classify(raw, height);
            let id = CardId(raw.card_id);

            let mut record = match previous.remove(&id) {
                Some(mut record) => {
                    record.update_position(raw, height, zone)?;
                    record
                }
                None => {
                    let Some(attrs) = self.catalog.lookup(&raw.card_code) else {
                        return Err(self.catalog_miss(&raw.card_code));
                    };
                    debug!(card = %id, code = %raw.card_code, zone = %zone, "New card tracked");
                    CardRecord::new(attrs, raw, height, zone)
                }
            };

            if zone.reads_stats() {
                if let Some(frame) = frame {
                    match self.stats.read_card(frame, locator, &record) {
                        Some(stats) => record.update_stats(stats.attack, stats.health),
                        None => {
                            warn!(card = %record, "Stats not recognized, keeping previous values")
                        }
                    }
                }
            }

            if !snapshot.insert(record) {
                warn!(card = %id, "Duplicate card id in telemetry, keeping the first");
            }
        }

        snapshot.sort_zones();
        snapshot.touch();
        debug!(cards = snapshot.len(), dropped = previous.len(), "Snapshot rebuilt");
        Ok(())
    }

    fn catalog_miss(&self, code: &str) -> Error {
        error!(code, "Card code missing from the catalog");
        if let Err(e) = self.catalog.purge() {
            warn!("Failed to purge card catalog: {}", e);
        }
        Error::CatalogMiss {
            code: code.to_string(),
        }
    }
}

impl std::fmt::Debug for CardTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardTracker")
            .field("classifier", &self.classifier)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::stats::{DigitReading, DigitRecognizer, NoopRecognizer};
    use crate::testing::{self, card, raw, FrameBuilder};
    use image::{GrayImage, Rgb};
    use lorbot_core::{CardStats, Rect, RegionCalibration, Size, StatsCalibration, Zone};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn tracker(catalog: Arc<MemoryCatalog>) -> CardTracker {
        CardTracker::new(
            ZoneClassifier::default(),
            catalog,
            StatsReader::new(StatsCalibration::default(), Arc::new(NoopRecognizer)),
        )
    }

    fn locator() -> ComponentLocator {
        ComponentLocator::new(Size::new(1920, 1080), RegionCalibration::default())
    }

    fn catalog() -> Arc<MemoryCatalog> {
        Arc::new(MemoryCatalog::from_cards(vec![
            card("01DE001", 2, 2, 2),
            card("01DE002", 3, 3, 3),
        ]))
    }

    #[test]
    fn test_records_persist_and_move() {
        let tracker = tracker(catalog());
        let locator = locator();
        let mut snapshot = BoardSnapshot::new();

        let hand = testing::telemetry_y(Zone::Hand, 1080);
        let board = testing::telemetry_y(Zone::Board, 1080);

        tracker
            .update(&mut snapshot, &[raw(7, "01DE001", 600, hand, true)], &locator, None)
            .unwrap();
        assert_eq!(snapshot.zone_ids(Zone::Hand), &[CardId(7)]);

        tracker
            .update(&mut snapshot, &[raw(7, "01DE001", 800, board, true)], &locator, None)
            .unwrap();
        assert!(snapshot.zone_ids(Zone::Hand).is_empty());
        let record = snapshot.get(CardId(7)).unwrap();
        assert_eq!(record.zone(), Zone::Board);
        assert_eq!(record.rect().x, 800);
    }

    #[test]
    fn test_missing_ids_are_dropped_and_face_skipped() {
        let tracker = tracker(catalog());
        let locator = locator();
        let mut snapshot = BoardSnapshot::new();
        let hand = testing::telemetry_y(Zone::Hand, 1080);

        let first = vec![
            raw(1, "01DE001", 500, hand, true),
            raw(2, "01DE002", 700, hand, true),
            raw(3, "face", 100, 400, true),
        ];
        tracker.update(&mut snapshot, &first, &locator, None).unwrap();
        assert_eq!(snapshot.len(), 2);

        tracker
            .update(&mut snapshot, &first[1..], &locator, None)
            .unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get(CardId(1)).is_none());
    }

    #[test]
    fn test_zone_order_by_x() {
        let tracker = tracker(catalog());
        let mut snapshot = BoardSnapshot::new();
        let board = testing::telemetry_y(Zone::Board, 1080);

        let rects = vec![
            raw(1, "01DE001", 900, board, true),
            raw(2, "01DE002", 300, board, true),
            raw(3, "01DE001", 600, board, true),
        ];
        tracker.update(&mut snapshot, &rects, &locator(), None).unwrap();
        assert_eq!(
            snapshot.zone_ids(Zone::Board),
            &[CardId(2), CardId(3), CardId(1)]
        );
    }

    #[test]
    fn test_catalog_miss_purges_and_fails() {
        let catalog = catalog();
        let tracker = tracker(catalog.clone());
        let mut snapshot = BoardSnapshot::new();

        let err = tracker
            .update(&mut snapshot, &[raw(9, "09XX404", 500, 300, true)], &locator(), None)
            .unwrap_err();

        assert!(matches!(err, Error::CatalogMiss { ref code } if code == "09XX404"));
        assert!(!err.is_transient());
        assert_eq!(catalog.purge_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let tracker = tracker(catalog());
        let mut snapshot = BoardSnapshot::new();
        let hand = testing::telemetry_y(Zone::Hand, 1080);

        let rects = vec![
            raw(4, "01DE001", 500, hand, true),
            raw(4, "01DE001", 900, hand, true),
        ];
        tracker.update(&mut snapshot, &rects, &locator(), None).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(CardId(4)).unwrap().rect().x, 500);
    }

    /// Reads `value` until switched blind.
    struct SwitchRecognizer {
        value: i32,
        blind: AtomicBool,
    }

    impl DigitRecognizer for SwitchRecognizer {
        fn recognize(&self, _mask: &GrayImage) -> Option<DigitReading> {
            (!self.blind.load(Ordering::SeqCst)).then_some(DigitReading {
                value: self.value,
                confidence: 1.0,
            })
        }
    }

    #[test]
    fn test_recognition_miss_keeps_stats() {
        let recognizer = Arc::new(SwitchRecognizer {
            value: 7,
            blind: AtomicBool::new(false),
        });
        let tracker = CardTracker::new(
            ZoneClassifier::default(),
            catalog(),
            StatsReader::new(StatsCalibration::default(), recognizer.clone()),
        );
        let locator = locator();
        let frame = FrameBuilder::new(Size::new(1920, 1080))
            .fill(Rect::new(400, 820, 320, 150), Rgb([255, 255, 255]))
            .build();
        let board = testing::telemetry_y(Zone::Board, 1080);
        let rects = [raw(1, "01DE001", 500, board, true)];
        let mut snapshot = BoardSnapshot::new();

        tracker
            .update(&mut snapshot, &rects, &locator, Some(&frame))
            .unwrap();
        let expected = Some(CardStats {
            attack: 7,
            health: 7,
        });
        assert_eq!(snapshot.get(CardId(1)).unwrap().stats(), expected);

        recognizer.blind.store(true, Ordering::SeqCst);
        tracker
            .update(&mut snapshot, &rects, &locator, Some(&frame))
            .unwrap();
        assert_eq!(snapshot.get(CardId(1)).unwrap().stats(), expected);
        assert_eq!(snapshot.get(CardId(1)).unwrap().attack(), 7);
    }
}
