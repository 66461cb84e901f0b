//! Turn orchestrator: maps each inferred phase to a bounded action sequence.
//!
//! Every tick refreshes the observer, dispatches on the phase, waits the tick
//! pause and parks the pointer after any handled phase. Handlers refresh
//! again after any action that can change the board before taking the next
//! decision.

use lorbot_core::{
    BotConfig, CardId, CardRecord, Error, Jitter, NavigationSettings, Phase, Point, RatioPoint,
    Result, TimingSettings, Zone,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::actuator::{Actuator, ScreenMapper};
use crate::memory::TurnMemory;
use crate::navigation::DeckSelectionRoute;
use crate::observer::GameObserver;
use crate::poll::{poll_observer, PollCondition};
use crate::strategy::{is_lane_taken, CardTarget, GameplayAction, PlayChoice, Strategy};

/// Cards dealt on the mulligan screen.
pub const MULLIGAN_HAND_SIZE: usize = 4;

/// Drives the game through a strategy and an actuator.
pub struct TurnOrchestrator {
    observer: GameObserver,
    strategy: Arc<dyn Strategy>,
    actuator: Arc<dyn Actuator>,
    timing: TimingSettings,
    navigation: NavigationSettings,
    nexus: (RatioPoint, RatioPoint),
    route: DeckSelectionRoute,
    memory: TurnMemory,
    rng: StdRng,
    cancel: Arc<AtomicBool>,
}

impl TurnOrchestrator {
    /// Create an orchestrator.
    pub fn new(
        config: &BotConfig,
        observer: GameObserver,
        strategy: Arc<dyn Strategy>,
        actuator: Arc<dyn Actuator>,
    ) -> Self {
        let regions = &config.calibration.regions;
        Self {
            observer,
            strategy,
            actuator,
            timing: config.timing.clone(),
            navigation: config.navigation.clone(),
            nexus: (regions.local_nexus, regions.opponent_nexus),
            route: DeckSelectionRoute::new(&config.navigation, &config.bot),
            memory: TurnMemory::default(),
            rng: StdRng::from_entropy(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Seed the jitter generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Game observer.
    pub fn observer(&self) -> &GameObserver {
        &self.observer
    }

    /// Per-match memory.
    pub fn memory(&self) -> TurnMemory {
        self.memory
    }

    /// Cancellation flag, checked between ticks.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Operator pause flag.
    pub fn pause_flag(&self) -> Arc<AtomicBool> {
        self.observer.pause_flag()
    }

    /// Run ticks until cancelled.
    ///
    /// Transient failures are logged and retried on the next tick. Anything
    /// else stops the loop and is returned.
    pub async fn run(&mut self) -> Result<()> {
        info!(strategy = self.strategy.name(), "Orchestrator started");

        while !self.cancel.load(Ordering::SeqCst) {
            if let Err(e) = self.tick().await {
                if !e.is_transient() {
                    error!("Orchestrator stopped: {}", e);
                    return Err(e);
                }
                warn!("Tick failed, retrying: {}", e);
                self.wait(self.timing.tick_pause_ms).await;
            }
        }

        let ledger = self.observer.ledger();
        info!(
            games = ledger.games(),
            wins = ledger.wins(),
            "Orchestrator cancelled"
        );
        Ok(())
    }

    /// Refresh, handle the inferred phase once and return it.
    #[instrument(skip(self), fields(phase = tracing::field::Empty))]
    pub async fn tick(&mut self) -> Result<Phase> {
        let phase = self.observer.refresh().await?;
        tracing::Span::current().record("phase", tracing::field::display(phase));

        // A stack seen outside our turn is a new stack
        if !matches!(phase, Phase::DefendTurn | Phase::AttackTurn) {
            self.memory.stack_debounce_armed = false;
        }

        let handled = match phase {
            Phase::None | Phase::Hold | Phase::SearchGame | Phase::Attacking => {
                debug!("Nothing to do");
                false
            }
            Phase::UserInteractNotReady | Phase::OpponentTurn => {
                self.wait(self.timing.idle_wait_ms).await;
                false
            }
            Phase::Menus | Phase::MenusDeckSelected => {
                self.select_deck().await?;
                true
            }
            Phase::Mulligan => {
                self.handle_mulligan().await?;
                true
            }
            Phase::Blocking => {
                self.handle_blocking().await?;
                true
            }
            Phase::DefendTurn => {
                self.handle_defend().await?;
                true
            }
            Phase::AttackTurn => {
                self.handle_attack().await?;
                true
            }
            Phase::End => {
                self.handle_end().await?;
                true
            }
        };

        self.wait(self.timing.tick_pause_ms).await;
        // Inert phases leave the pointer alone
        if handled {
            let rest = self.mapper()?.rest_point();
            self.actuator.reset_pointer(rest).await?;
        }
        Ok(phase)
    }

    async fn select_deck(&mut self) -> Result<()> {
        self.focus().await?;
        debug!(clicks = self.route.len(), "Selecting deck");

        let steps = self.route.steps().to_vec();
        for (name, ratio) in steps {
            let at = self.mapper()?.ratio_point(ratio);
            debug!(step = name, "Menu click");
            self.actuator.click_ratio_point(ratio, at).await?;
            self.jitter(self.timing.menu_jitter).await;
        }

        self.wait(self.timing.matchmaking_dismiss_ms).await;
        let ok = self.navigation.matchmaking_ok;
        let at = self.mapper()?.ratio_point(ok);
        self.actuator.click_ratio_point(ok, at).await
    }

    async fn handle_mulligan(&mut self) -> Result<()> {
        if self.memory.mulligan_handled {
            self.wait(self.timing.mulligan_poll_ms).await;
            return Ok(());
        }

        let condition =
            PollCondition::new(self.timing.mulligan_poll_ms, self.timing.mulligan_attempts);
        let dealt = poll_observer(&mut self.observer, condition, |o| {
            o.snapshot().zone_len(Zone::Mulligan) == MULLIGAN_HAND_SIZE
        })
        .await?;
        if !dealt.condition_met {
            warn!(
                cards = self.observer.snapshot().zone_len(Zone::Mulligan),
                "Mulligan hand incomplete, retrying next tick"
            );
            return Ok(());
        }

        let clicks = {
            let snapshot = self.observer.snapshot();
            let candidates: Vec<&CardRecord> = snapshot.zone(Zone::Mulligan).collect();
            let replace = self.strategy.mulligan(&candidates);
            info!(replace = replace.len(), "Mulligan");

            let mapper = self.mapper()?;
            replace
                .into_iter()
                .filter_map(|id| {
                    snapshot
                        .get(id)
                        .filter(|card| card.zone() == Zone::Mulligan)
                        .map(|card| (id, mapper.card_point(card)))
                })
                .collect::<Vec<_>>()
        };

        self.focus().await?;
        for (card, at) in clicks {
            self.actuator.click_card(card, at).await?;
            self.jitter(self.timing.mulligan_click_jitter).await;
        }
        self.actuator.press_commit().await?;
        self.memory.mulligan_handled = true;

        let cleared = poll_observer(&mut self.observer, condition, |o| {
            o.snapshot().zone_len(Zone::Mulligan) == 0
        })
        .await?;
        if !cleared.condition_met {
            warn!("Mulligan zone did not clear");
        }
        Ok(())
    }

    async fn handle_blocking(&mut self) -> Result<()> {
        let plan = self.strategy.block(&self.observer.view(Phase::Blocking));
        info!(
            blockers = plan.assignments.len(),
            spells = plan.spells.len(),
            "Blocking"
        );
        self.focus().await?;

        for &(ally, opponent) in &plan.assignments {
            self.observer.refresh().await?;
            let Some((from, to)) = self.block_drag(ally, opponent)? else {
                continue;
            };
            self.actuator
                .drag_card_onto_card(ally, opponent, from, to)
                .await?;
            self.jitter(self.timing.block_jitter).await;
        }

        for spell in &plan.spells {
            self.play_card(spell).await?;
        }
        self.actuator.press_commit().await?;

        let condition =
            PollCondition::new(self.timing.blocking_poll_ms, self.timing.blocking_attempts);
        let resolved =
            poll_observer(&mut self.observer, condition, |o| o.phase() != Phase::Blocking).await?;
        if !resolved.condition_met {
            warn!("Still blocking after commit");
        }
        Ok(())
    }

    /// Drag points for a blocker, after checking the pairing against the
    /// live board.
    fn block_drag(&self, ally: CardId, opponent: CardId) -> Result<Option<(Point, Point)>> {
        let snapshot = self.observer.snapshot();
        let (Some(own), Some(target)) = (snapshot.get(ally), snapshot.get(opponent)) else {
            debug!(%ally, %opponent, "Blocker or attacker gone");
            return Ok(None);
        };
        if own.zone() != Zone::Board {
            debug!(%ally, zone = %own.zone(), "Blocker not on the board");
            return Ok(None);
        }

        let lane: Vec<&CardRecord> = snapshot.zone(Zone::AttackOrBlock).collect();
        if is_lane_taken(&lane, target) {
            info!(%opponent, "Attacker already blocked");
            return Ok(None);
        }

        let mapper = self.mapper()?;
        Ok(Some((mapper.card_point(own), mapper.card_point(target))))
    }

    async fn handle_defend(&mut self) -> Result<()> {
        if self.resolve_turn(Phase::DefendTurn).await? {
            return Ok(());
        }
        debug!("Nothing to play, passing");
        self.actuator.press_commit().await?;
        self.wait(self.timing.action_settle_ms).await;
        Ok(())
    }

    async fn handle_attack(&mut self) -> Result<()> {
        if self.resolve_turn(Phase::AttackTurn).await? {
            return Ok(());
        }

        let queue = {
            let view = self.observer.view(Phase::AttackTurn);
            let board = view.zone(Zone::Board);
            self.strategy.attack(&view, &board)
        };
        info!(attackers = queue.len(), "Attacking");
        self.focus().await?;

        for card in queue {
            let drag = {
                let mapper = self.mapper()?;
                self.observer
                    .snapshot()
                    .get(card)
                    .filter(|record| record.zone() == Zone::Board)
                    .map(|record| (mapper.card_point(record), mapper.field_point(record)))
            };
            let Some((from, to)) = drag else {
                debug!(%card, "Attacker left the board");
                continue;
            };
            self.actuator.drag_card_to_field(card, from, to).await?;
            self.jitter(self.timing.attack_jitter).await;
            self.observer.refresh().await?;
        }

        self.wait(self.timing.attack_settle_ms).await;
        self.actuator.press_commit().await?;
        self.wait(self.timing.action_settle_ms).await;
        self.observer.refresh().await?;
        Ok(())
    }

    /// Shared turn step: opposing spells, then the strategy's coarse
    /// decision and at most one card played.
    ///
    /// Returns whether the turn was handled.
    async fn resolve_turn(&mut self, phase: Phase) -> Result<bool> {
        if self.observer.snapshot().spell_stack_is_spell_only() {
            if self.memory.stack_debounce_armed {
                let cards = self.observer.snapshot().zone_len(Zone::SpellStack);
                info!(cards, "Passing on opposing spells");
                self.actuator.press_commit().await?;
                self.wait(self.timing.stack_wait_per_card_ms * cards as u64)
                    .await;
            } else {
                debug!("Spell stack seen, debouncing");
                self.memory.stack_debounce_armed = true;
                self.wait(self.timing.stack_debounce_ms).await;
            }
            self.observer.refresh().await?;
            return Ok(true);
        }
        self.memory.stack_debounce_armed = false;

        self.observer.refresh().await?;
        let action = {
            let view = self.observer.view(phase);
            match phase {
                Phase::AttackTurn => self.strategy.attack_token_usage(&view),
                _ => self.strategy.respond_to_opponent_action(&view),
            }
        };
        info!(?action, "Turn decision");

        if action == GameplayAction::Skip {
            self.actuator.press_commit().await?;
            self.wait(self.timing.action_settle_ms).await;
            self.observer.refresh().await?;
            return Ok(true);
        }
        if action != GameplayAction::PlayCards
            || self.observer.view(phase).playable_cards().is_empty()
        {
            return Ok(false);
        }

        self.observer.refresh().await?;
        let choice = {
            let view = self.observer.view(phase);
            let playable = view.playable_cards();
            self.strategy.play_hand_card(&view, &playable)
        };
        let Some(choice) = choice else {
            return Ok(false);
        };

        if !self.play_card(&choice).await? {
            return Ok(false);
        }
        self.wait(self.timing.action_settle_ms).await;
        self.observer.refresh().await?;
        Ok(true)
    }

    /// Drag a card out, click its targets and confirm spells.
    ///
    /// Returns false when the card is no longer tracked.
    async fn play_card(&mut self, choice: &PlayChoice) -> Result<bool> {
        let drag = {
            let mapper = self.mapper()?;
            self.observer.snapshot().get(choice.card).map(|card| {
                (
                    card.is_spell(),
                    mapper.card_point(card),
                    mapper.field_point(card),
                )
            })
        };
        let Some((is_spell, from, to)) = drag else {
            warn!(card = %choice.card, "Card to play is gone");
            return Ok(false);
        };

        info!(card = %choice.card, targets = choice.targets.len(), "Playing card");
        self.focus().await?;
        self.actuator.drag_card_to_field(choice.card, from, to).await?;

        for &target in &choice.targets {
            self.click_target(target).await?;
            self.jitter(self.timing.target_jitter).await;
        }

        if is_spell {
            self.wait(self.timing.spell_confirm_ms).await;
            self.actuator.press_commit().await?;
        }
        Ok(true)
    }

    async fn click_target(&self, target: CardTarget) -> Result<()> {
        let ratio = match target {
            CardTarget::Card(id) => {
                let at = {
                    let mapper = self.mapper()?;
                    self.observer
                        .snapshot()
                        .get(id)
                        .map(|card| mapper.card_point(card))
                };
                return match at {
                    Some(at) => self.actuator.click_card(id, at).await,
                    None => {
                        warn!(target = %id, "Target card is gone");
                        Ok(())
                    }
                };
            }
            CardTarget::Nexus => self.nexus.0,
            CardTarget::OpponentNexus => self.nexus.1,
        };
        let at = self.mapper()?.ratio_point(ratio);
        self.actuator.click_ratio_point(ratio, at).await
    }

    async fn handle_end(&mut self) -> Result<()> {
        self.memory.reset();
        let ledger = *self.observer.ledger();
        info!(games = ledger.games(), wins = ledger.wins(), "Match over");
        self.focus().await?;

        for attempt in 1..=self.timing.end_continue_attempts {
            if self.observer.refresh().await? == Phase::MenusDeckSelected {
                debug!(attempt, "Back at deck selection");
                return Ok(());
            }
            let target = self.navigation.end_continue;
            let at = self.mapper()?.ratio_point(target);
            self.actuator.click_ratio_point(target, at).await?;
            self.wait(self.timing.end_continue_ms).await;
        }

        warn!("End screen did not return to deck selection");
        Ok(())
    }

    fn mapper(&self) -> Result<ScreenMapper<'_>> {
        let window = self.observer.window().ok_or(Error::WindowNotFound)?;
        Ok(ScreenMapper::new(window.geometry, &self.navigation))
    }

    async fn focus(&self) -> Result<()> {
        match self.observer.window() {
            Some(window) if !window.foreground => self.actuator.focus(&window).await,
            _ => Ok(()),
        }
    }

    async fn wait(&self, ms: u64) {
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    async fn jitter(&mut self, jitter: Jitter) {
        let ms = self.rng.gen_range(jitter.range());
        self.wait(ms).await;
    }
}

impl std::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("strategy", &self.strategy.name())
            .field("observer", &self.observer)
            .field("memory", &self.memory)
            .finish()
    }
}
