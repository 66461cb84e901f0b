//! Phase inference: a priority-ordered cascade of rules.
//!
//! Each [`PhaseRule`] looks at one poll through a [`PhaseContext`] and either
//! claims a phase or passes. Rules run from the highest priority down; the
//! first claim wins and [`Phase::DefendTurn`] is the fallback.

use lorbot_capture::Frame;
use lorbot_core::{BoardSnapshot, CardPositions, MatchResult, Phase, PhaseCalibration, Rect};
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::locator::ComponentLocator;
use crate::rules::{
    AttackTokenRule, BlockingRule, BusyRule, HoldRule, MenusRule, MulliganRule, OpponentTurnRule,
};
use crate::zones::ZoneClassifier;

/// Everything a rule may look at for one poll.
///
/// Pixel probes are measured on the first frame of the poll. The turn button
/// probe is shared by several rules and measured at most once.
pub struct PhaseContext<'a> {
    /// First frame of the poll
    pub frame: &'a Frame,
    /// Regions for the current window size
    pub locator: &'a ComponentLocator,
    /// Probe colors and thresholds
    pub calibration: &'a PhaseCalibration,
    /// Zone classifier, for the mulligan shelf
    pub classifier: &'a ZoneClassifier,
    /// Latest telemetry rectangles and match state
    pub positions: &'a CardPositions,
    /// Snapshot rebuilt from `positions`
    pub snapshot: &'a BoardSnapshot,
    /// Latest match result, if one was fetched
    pub match_result: Option<MatchResult>,
    /// Id of the last match already counted
    pub last_game_id: i64,
    /// Operator pause
    pub paused: bool,
    can_interact: OnceCell<bool>,
}

impl<'a> PhaseContext<'a> {
    /// Create a context with no match result, no counted match and no pause.
    pub fn new(
        frame: &'a Frame,
        locator: &'a ComponentLocator,
        calibration: &'a PhaseCalibration,
        classifier: &'a ZoneClassifier,
        positions: &'a CardPositions,
        snapshot: &'a BoardSnapshot,
    ) -> Self {
        Self {
            frame,
            locator,
            calibration,
            classifier,
            positions,
            snapshot,
            match_result: None,
            last_game_id: MatchLedger::NO_GAME,
            paused: false,
            can_interact: OnceCell::new(),
        }
    }

    /// Set the latest match result.
    pub fn with_match_result(mut self, result: Option<MatchResult>) -> Self {
        self.match_result = result;
        self
    }

    /// Set the id of the last counted match.
    pub fn with_last_game_id(mut self, game_id: i64) -> Self {
        self.last_game_id = game_id;
        self
    }

    /// Set the operator pause flag.
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    fn count(&self, probe: &'static str, rect: Rect, range: &lorbot_core::HsvRange) -> u32 {
        let count = self.frame.count_in_hsv_region(rect, range);
        debug!(probe, count, "Probe pixels");
        count
    }

    /// Deck-edit button pixels.
    pub fn deck_edit_pixels(&self) -> u32 {
        self.count(
            "deck_edit",
            self.locator.deck_edit_rect(),
            &self.calibration.deck_edit_range,
        )
    }

    /// Rounds log pixels.
    pub fn rounds_log_pixels(&self) -> u32 {
        self.count(
            "rounds_log",
            self.locator.rounds_log_rect(),
            &self.calibration.rounds_log_range,
        )
    }

    /// Turn button pixels in the ready color.
    pub fn turn_ready_pixels(&self) -> u32 {
        self.count(
            "turn_ready",
            self.locator.turn_button_rect(),
            &self.calibration.turn_ready_range,
        )
    }

    /// Whether the turn button shows the local player may act.
    pub fn can_interact(&self) -> bool {
        *self
            .can_interact
            .get_or_init(|| self.turn_ready_pixels() > self.calibration.turn_ready_threshold)
    }

    /// Attack token pixels, one count per configured color range.
    pub fn attack_token_pixels(&self) -> Vec<u32> {
        let rect = self.locator.attack_token_rect();
        self.calibration
            .attack_token_ranges
            .iter()
            .map(|range| self.count("attack_token", rect, range))
            .collect()
    }
}

/// A rule of the phase cascade.
pub trait PhaseRule: Send + Sync {
    /// Rule name for logging.
    fn name(&self) -> &'static str;

    /// Priority (higher = evaluated first).
    ///
    /// Standard priorities:
    /// - 100: operator hold
    /// - 90: menus
    /// - 80: client busy
    /// - 70-60: mulligan and blocking
    /// - 50-40: turn ownership
    fn priority(&self) -> u32;

    /// Claim a phase for this poll, or pass.
    fn evaluate(&self, context: &PhaseContext<'_>) -> Option<Phase>;
}

/// Rules evaluated in priority order with a fallback phase.
pub struct PhaseCascade {
    rules: Vec<Arc<dyn PhaseRule>>,
    fallback: Phase,
}

impl PhaseCascade {
    /// Create an empty cascade falling back to [`Phase::DefendTurn`].
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Phase::DefendTurn,
        }
    }

    /// Cascade with every standard rule.
    pub fn standard() -> Self {
        let mut cascade = Self::new();
        cascade.add_rule(Arc::new(HoldRule));
        cascade.add_rule(Arc::new(MenusRule));
        cascade.add_rule(Arc::new(BusyRule));
        cascade.add_rule(Arc::new(MulliganRule));
        cascade.add_rule(Arc::new(BlockingRule));
        cascade.add_rule(Arc::new(OpponentTurnRule));
        cascade.add_rule(Arc::new(AttackTokenRule));
        cascade
    }

    /// Add a rule to the cascade.
    pub fn add_rule(&mut self, rule: Arc<dyn PhaseRule>) {
        self.rules.push(rule);
        // Stable, so equal priorities keep insertion order
        self.rules.sort_by_key(|r| std::cmp::Reverse(r.priority()));
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Phase claimed by the first matching rule.
    pub fn evaluate(&self, context: &PhaseContext<'_>) -> Phase {
        for rule in &self.rules {
            if let Some(phase) = rule.evaluate(context) {
                trace!(rule = rule.name(), %phase, "Phase rule matched");
                return phase;
            }
        }
        self.fallback
    }
}

impl Default for PhaseCascade {
    fn default() -> Self {
        Self::standard()
    }
}

/// Counts finished matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLedger {
    last_game_id: i64,
    games: u32,
    wins: u32,
}

impl MatchLedger {
    /// Id meaning "no match counted yet".
    pub const NO_GAME: i64 = -1;

    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            last_game_id: Self::NO_GAME,
            games: 0,
            wins: 0,
        }
    }

    /// Id of the last counted match.
    pub fn last_game_id(&self) -> i64 {
        self.last_game_id
    }

    /// Matches counted.
    pub fn games(&self) -> u32 {
        self.games
    }

    /// Matches won.
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Whether `result` is a match not counted yet.
    pub fn is_new(&self, result: &MatchResult) -> bool {
        result.game_id > self.last_game_id
    }

    /// Count `result` if it is new. Returns whether it was counted.
    pub fn record(&mut self, result: &MatchResult) -> bool {
        if !self.is_new(result) {
            return false;
        }
        self.last_game_id = result.game_id;
        self.games += 1;
        if result.local_player_won {
            self.wins += 1;
        }
        info!(
            game_id = result.game_id,
            won = result.local_player_won,
            games = self.games,
            wins = self.wins,
            "Match finished"
        );
        true
    }
}

impl Default for MatchLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Phase cascade plus the match ledger it feeds.
#[derive(Default)]
pub struct PhaseInference {
    cascade: PhaseCascade,
    ledger: MatchLedger,
}

impl PhaseInference {
    /// Create an inference with a custom cascade.
    pub fn new(cascade: PhaseCascade) -> Self {
        Self {
            cascade,
            ledger: MatchLedger::new(),
        }
    }

    /// Match ledger.
    pub fn ledger(&self) -> &MatchLedger {
        &self.ledger
    }

    /// Infer the phase and count the match when it is [`Phase::End`].
    pub fn infer(&mut self, context: &PhaseContext<'_>) -> Phase {
        let phase = self.cascade.evaluate(context);
        if phase == Phase::End {
            if let Some(result) = context.match_result {
                self.ledger.record(&result);
            }
        }
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FrameBuilder;
    use lorbot_core::{RegionCalibration, Size};

    struct FixedRule {
        name: &'static str,
        priority: u32,
        phase: Option<Phase>,
    }

    impl PhaseRule for FixedRule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn evaluate(&self, _context: &PhaseContext<'_>) -> Option<Phase> {
            self.phase
        }
    }

    fn fixed(name: &'static str, priority: u32, phase: Option<Phase>) -> Arc<dyn PhaseRule> {
        Arc::new(FixedRule {
            name,
            priority,
            phase,
        })
    }

    #[test]
    fn test_standard_order() {
        assert_eq!(
            PhaseCascade::standard().rule_names(),
            vec!["hold", "menus", "busy", "mulligan", "blocking", "opponent_turn", "attack_token"]
        );
    }

    #[test]
    fn test_priority_order_and_fallback() {
        let size = Size::new(1920, 1080);
        let frame = FrameBuilder::new(size).build();
        let locator = ComponentLocator::new(size, RegionCalibration::default());
        let calibration = PhaseCalibration::default();
        let classifier = ZoneClassifier::default();
        let positions = CardPositions::default();
        let snapshot = BoardSnapshot::new();
        let context = PhaseContext::new(
            &frame,
            &locator,
            &calibration,
            &classifier,
            &positions,
            &snapshot,
        );

        let mut cascade = PhaseCascade::new();
        assert_eq!(cascade.evaluate(&context), Phase::DefendTurn);

        cascade.add_rule(fixed("low", 10, Some(Phase::Menus)));
        cascade.add_rule(fixed("pass", 90, None));
        cascade.add_rule(fixed("high", 50, Some(Phase::Mulligan)));
        assert_eq!(cascade.rule_names(), vec!["pass", "high", "low"]);
        assert_eq!(cascade.evaluate(&context), Phase::Mulligan);
    }

    #[test]
    fn test_ledger_counts_new_results_once() {
        let mut ledger = MatchLedger::new();
        let won = MatchResult {
            game_id: 0,
            local_player_won: true,
        };
        let lost = MatchResult {
            game_id: 1,
            local_player_won: false,
        };

        assert!(ledger.record(&won));
        assert!(!ledger.record(&won));
        assert!(ledger.record(&lost));
        assert_eq!(ledger.games(), 2);
        assert_eq!(ledger.wins(), 1);
        assert_eq!(ledger.last_game_id(), 1);
        assert!(!ledger.record(&MatchResult::default()));
    }
}
