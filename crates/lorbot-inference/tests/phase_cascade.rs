//! End-to-end phase inference on synthetic frames.

use std::sync::Arc;

use lorbot_capture::Frame;
use lorbot_core::{
    BoardSnapshot, CardPositions, MatchResult, Phase, PhaseCalibration, RawRectangle,
    RegionCalibration, Size, StatsCalibration, Zone,
};
use lorbot_inference::testing::{self, card, raw, telemetry_y, FrameBuilder};
use lorbot_inference::{
    CardTracker, ComponentLocator, MemoryCatalog, NoopRecognizer, PhaseContext, PhaseInference,
    StatsReader, ZoneClassifier,
};

const SIZE: Size = Size {
    width: 1920,
    height: 1080,
};

struct Poll {
    frame: Frame,
    positions: CardPositions,
    snapshot: BoardSnapshot,
    locator: ComponentLocator,
    calibration: PhaseCalibration,
    classifier: ZoneClassifier,
}

impl Poll {
    fn new(frame: Frame, positions: CardPositions) -> Self {
        let locator = ComponentLocator::new(SIZE, RegionCalibration::default());
        let catalog = MemoryCatalog::from_cards(vec![
            card("01DE001", 2, 2, 2),
            card("01DE002", 5, 5, 5),
        ]);
        let tracker = CardTracker::new(
            ZoneClassifier::default(),
            Arc::new(catalog),
            StatsReader::new(StatsCalibration::default(), Arc::new(NoopRecognizer)),
        );
        let mut snapshot = BoardSnapshot::new();
        tracker
            .update(&mut snapshot, &positions.rectangles, &locator, Some(&frame))
            .unwrap();

        Self {
            frame,
            positions,
            snapshot,
            locator,
            calibration: PhaseCalibration::default(),
            classifier: ZoneClassifier::default(),
        }
    }

    fn context(&self) -> PhaseContext<'_> {
        PhaseContext::new(
            &self.frame,
            &self.locator,
            &self.calibration,
            &self.classifier,
            &self.positions,
            &self.snapshot,
        )
    }

    fn infer(&self) -> Phase {
        PhaseInference::default().infer(&self.context())
    }
}

fn in_match(rects: Vec<RawRectangle>) -> CardPositions {
    testing::positions(SIZE, rects)
}

fn ready() -> FrameBuilder {
    FrameBuilder::new(SIZE).rounds_log_idle().turn_ready()
}

#[test]
fn test_defend_turn_is_fallback() {
    let poll = Poll::new(ready().build(), in_match(vec![]));
    assert_eq!(poll.infer(), Phase::DefendTurn);
}

#[test]
fn test_attack_turn() {
    let poll = Poll::new(ready().attack_token().build(), in_match(vec![]));
    assert_eq!(poll.infer(), Phase::AttackTurn);
}

#[test]
fn test_opponent_turn() {
    let frame = FrameBuilder::new(SIZE).rounds_log_idle().attack_token().build();
    let poll = Poll::new(frame, in_match(vec![]));
    assert_eq!(poll.infer(), Phase::OpponentTurn);
}

#[test]
fn test_busy_client_wins_over_turn() {
    let poll = Poll::new(FrameBuilder::new(SIZE).turn_ready().build(), in_match(vec![]));
    assert_eq!(poll.infer(), Phase::UserInteractNotReady);
}

#[test]
fn test_blocking() {
    let y = telemetry_y(Zone::OpponentAttackOrBlock, SIZE.height);
    let poll = Poll::new(
        ready().attack_token().build(),
        in_match(vec![raw(8, "01DE002", 900, y, false)]),
    );
    assert_eq!(poll.infer(), Phase::Blocking);
}

#[test]
fn test_mulligan_wins_over_blocking() {
    let shelf = telemetry_y(Zone::Mulligan, SIZE.height);
    let lane = telemetry_y(Zone::OpponentAttackOrBlock, SIZE.height);
    let poll = Poll::new(
        ready().build(),
        in_match(vec![
            raw(1, "01DE001", 500, shelf, true),
            raw(2, "01DE001", 700, shelf, true),
            raw(8, "01DE002", 900, lane, false),
        ]),
    );
    assert_eq!(poll.infer(), Phase::Mulligan);
}

#[test]
fn test_hold_wins_over_everything() {
    let shelf = telemetry_y(Zone::Mulligan, SIZE.height);
    let poll = Poll::new(
        ready().attack_token().build(),
        in_match(vec![
            raw(1, "01DE001", 500, shelf, true),
            raw(2, "01DE001", 700, shelf, true),
        ]),
    );
    let mut inference = PhaseInference::default();
    assert_eq!(inference.infer(&poll.context()), Phase::Mulligan);
    assert_eq!(inference.infer(&poll.context().with_paused(true)), Phase::Hold);
}

#[test]
fn test_end_counts_match_once() {
    let menus = CardPositions {
        game_state: "Menus".into(),
        ..CardPositions::default()
    };
    let poll = Poll::new(FrameBuilder::new(SIZE).build(), menus);
    let result = Some(MatchResult {
        game_id: 12,
        local_player_won: true,
    });

    let mut inference = PhaseInference::default();
    let first = poll
        .context()
        .with_match_result(result)
        .with_last_game_id(inference.ledger().last_game_id());
    assert_eq!(inference.infer(&first), Phase::End);
    assert_eq!(inference.ledger().games(), 1);
    assert_eq!(inference.ledger().wins(), 1);

    let second = poll
        .context()
        .with_match_result(result)
        .with_last_game_id(inference.ledger().last_game_id());
    assert_eq!(inference.infer(&second), Phase::Menus);
    assert_eq!(inference.ledger().games(), 1);
}
