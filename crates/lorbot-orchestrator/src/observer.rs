//! Game observer: one refresh turns capture and telemetry into a snapshot,
//! resources and a phase.
//!
//! The refresh order is fixed: window, frames, match result, card positions
//! (tracker), active deck, phase, then resources. Phase inference always sees
//! the snapshot built from the same poll.

use lorbot_capture::{CaptureProvider, Frame, TelemetryFeed, WindowInfo};
use lorbot_core::{
    ActiveDeck, BoardSnapshot, BotConfig, Calibration, CardPositions, ClientSettings, Error,
    MatchResult, Phase, ResourceState, Result, Size,
};
use lorbot_inference::{
    CardCatalog, CardTracker, ComponentLocator, DigitRecognizer, ManaReader, ManaTemplates,
    MatchLedger, NoopRecognizer, PhaseContext, PhaseInference, SpellManaReader, StatsReader,
    ZoneClassifier,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::strategy::GameView;

/// Owns the board snapshot and everything read from the game each poll.
pub struct GameObserver {
    capture: Arc<dyn CaptureProvider>,
    telemetry: Arc<dyn TelemetryFeed>,
    catalog: Arc<dyn CardCatalog>,
    calibration: Calibration,
    client: ClientSettings,
    capture_retry: Duration,
    tracker: CardTracker,
    mana: ManaReader,
    spell_mana: SpellManaReader,
    inference: PhaseInference,
    locator: ComponentLocator,
    paused: Arc<AtomicBool>,

    window: Option<WindowInfo>,
    positions: CardPositions,
    snapshot: BoardSnapshot,
    deck: Option<ActiveDeck>,
    match_result: Option<MatchResult>,
    resources: ResourceState,
    phase: Phase,
}

impl GameObserver {
    /// Create an observer with no digit recognizer and no mana templates.
    ///
    /// Without templates mana always reads as unknown.
    pub fn new(
        config: &BotConfig,
        capture: Arc<dyn CaptureProvider>,
        telemetry: Arc<dyn TelemetryFeed>,
        catalog: Arc<dyn CardCatalog>,
    ) -> Self {
        let calibration = config.calibration.clone();
        let tracker = build_tracker(&calibration, catalog.clone(), Arc::new(NoopRecognizer));

        Self {
            capture,
            telemetry,
            catalog,
            client: config.client.clone(),
            capture_retry: Duration::from_millis(config.timing.capture_retry_ms),
            tracker,
            mana: ManaReader::new(ManaTemplates::default(), &calibration.resources),
            spell_mana: SpellManaReader::new(&calibration.resources),
            inference: PhaseInference::default(),
            locator: ComponentLocator::new(Size::new(0, 0), calibration.regions.clone()),
            paused: Arc::new(AtomicBool::new(false)),
            calibration,
            window: None,
            positions: CardPositions::default(),
            snapshot: BoardSnapshot::new(),
            deck: None,
            match_result: None,
            resources: ResourceState::default(),
            phase: Phase::None,
        }
    }

    /// Use a digit recognizer for attack/health.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn DigitRecognizer>) -> Self {
        self.tracker = build_tracker(&self.calibration, self.catalog.clone(), recognizer);
        self
    }

    /// Use mana templates.
    pub fn with_mana_templates(mut self, templates: ManaTemplates) -> Self {
        self.mana = ManaReader::new(templates, &self.calibration.resources);
        self
    }

    /// Refresh everything and infer the phase.
    ///
    /// Window and frame failures abort the refresh with the previous state
    /// untouched. Telemetry failures degrade: the match result and snapshot
    /// keep their last values. A catalog miss is returned as is.
    pub async fn refresh(&mut self) -> Result<Phase> {
        let window = self.capture.window().await?;
        let size = window.geometry.size;
        if size != self.locator.size() {
            debug!(width = size.width, height = size.height, "Window resized");
            self.locator.set_size(size);
        }
        self.window = Some(window);

        let frames = self.capture_frames().await?;
        let Some(first) = frames.first() else {
            return Err(Error::Capture("no frames captured".into()));
        };

        match self.telemetry.match_result().await {
            Ok(result) => self.match_result = Some(result),
            Err(e) => warn!("Match result unavailable: {}", e),
        }

        match self.telemetry.card_positions().await {
            Ok(positions) => {
                self.tracker.update(
                    &mut self.snapshot,
                    &positions.rectangles,
                    &self.locator,
                    Some(first),
                )?;
                self.positions = positions;
            }
            Err(e) => {
                warn!("Card positions unavailable, keeping the last snapshot: {}", e);
                self.positions.game_state.clear();
            }
        }

        self.deck = match self.telemetry.active_deck().await {
            Ok(deck) => Some(deck),
            Err(e) => {
                debug!("Active deck unavailable: {}", e);
                None
            }
        };

        let phase = self.infer_phase(first);
        if phase != self.phase {
            info!(from = %self.phase, to = %phase, "Phase changed");
        }
        self.phase = phase;

        self.read_resources(&frames).await?;
        if phase == Phase::End {
            self.snapshot.clear();
            self.resources = ResourceState::default();
        }

        Ok(phase)
    }

    async fn capture_frames(&self) -> Result<Vec<Frame>> {
        let delay = Duration::from_millis(self.client.frame_delay_ms);
        self.capture
            .frames(self.client.frames_per_poll.max(1), delay)
            .await
    }

    fn infer_phase(&mut self, frame: &Frame) -> Phase {
        let context = PhaseContext::new(
            frame,
            &self.locator,
            &self.calibration.phase,
            self.tracker.classifier(),
            &self.positions,
            &self.snapshot,
        )
        .with_match_result(self.match_result)
        .with_last_game_id(self.inference.ledger().last_game_id())
        .with_paused(self.paused.load(Ordering::SeqCst));

        self.inference.infer(&context)
    }

    async fn read_resources(&mut self, frames: &[Frame]) -> Result<()> {
        let rect = self.locator.mana_rect();
        let mut reading = self.mana.read(frames, rect);

        // Retry with fresh frames only where mana matters
        if reading.is_none() && !self.mana.templates().is_empty() && self.phase.is_local_turn() {
            for round in 1..=self.calibration.resources.mana_retry_rounds {
                tokio::time::sleep(self.capture_retry).await;
                let retry = self.capture_frames().await?;
                reading = self.mana.read(&retry, rect);
                if reading.is_some() {
                    debug!(round, "Mana read after retry");
                    break;
                }
            }
        }

        let spell_mana = match frames.first() {
            Some(frame) => self
                .spell_mana
                .read(frame, &self.locator.spell_mana_rects()),
            None => 0,
        };

        self.resources = ResourceState {
            mana: reading.map_or(ResourceState::UNKNOWN_MANA, |r| r.value),
            spell_mana,
        };

        if self.phase.is_local_turn() && self.resources.mana_unknown() {
            warn!(phase = %self.phase, "Mana not recognized");
        }
        Ok(())
    }

    /// Phase of the last refresh.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current board snapshot.
    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    /// Mana and spell mana of the last refresh.
    pub fn resources(&self) -> ResourceState {
        self.resources
    }

    /// Strategy view of the current board for `phase`.
    pub fn view(&self, phase: Phase) -> GameView<'_> {
        GameView::new(&self.snapshot, phase, self.resources)
    }

    /// Window placement of the last refresh.
    pub fn window(&self) -> Option<WindowInfo> {
        self.window
    }

    /// Latest card positions document.
    pub fn positions(&self) -> &CardPositions {
        &self.positions
    }

    /// Active deck, if telemetry reported one on the last refresh.
    pub fn active_deck(&self) -> Option<&ActiveDeck> {
        self.deck.as_ref()
    }

    /// Latest match result.
    pub fn match_result(&self) -> Option<MatchResult> {
        self.match_result
    }

    /// Games and wins counted so far.
    pub fn ledger(&self) -> &MatchLedger {
        self.inference.ledger()
    }

    /// Regions for the current window size.
    pub fn locator(&self) -> &ComponentLocator {
        &self.locator
    }

    /// Operator pause flag. While set, every refresh reports [`Phase::Hold`].
    pub fn pause_flag(&self) -> Arc<AtomicBool> {
        self.paused.clone()
    }
}

fn build_tracker(
    calibration: &Calibration,
    catalog: Arc<dyn CardCatalog>,
    recognizer: Arc<dyn DigitRecognizer>,
) -> CardTracker {
    CardTracker::new(
        ZoneClassifier::new(calibration.zones.clone()),
        catalog,
        StatsReader::new(calibration.stats.clone(), recognizer),
    )
}

impl std::fmt::Debug for GameObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObserver")
            .field("phase", &self.phase)
            .field("cards", &self.snapshot.len())
            .field("resources", &self.resources)
            .field("window", &self.window)
            .finish()
    }
}
