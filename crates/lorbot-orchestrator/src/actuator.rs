//! Actuator interface and screen mapping.
//!
//! The orchestrator resolves every target to screen coordinates through
//! [`ScreenMapper`] before calling the [`Actuator`], so backends only move
//! the pointer and press.

use async_trait::async_trait;
use lorbot_capture::WindowInfo;
use lorbot_core::{CardId, CardRecord, NavigationSettings, Point, RatioPoint, Result, WindowGeometry};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Synthetic input backend.
///
/// Points are screen coordinates. Failures are reported as
/// [`lorbot_core::Error::Actuator`] and retried on the next tick.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Bring the game window to the foreground.
    async fn focus(&self, window: &WindowInfo) -> Result<()>;

    /// Click a card.
    async fn click_card(&self, card: CardId, at: Point) -> Result<()>;

    /// Drag a card from hand or board onto the field.
    async fn drag_card_to_field(&self, card: CardId, from: Point, to: Point) -> Result<()>;

    /// Drag a card onto another card.
    async fn drag_card_onto_card(
        &self,
        card: CardId,
        target: CardId,
        from: Point,
        to: Point,
    ) -> Result<()>;

    /// Press the commit / pass key.
    async fn press_commit(&self) -> Result<()>;

    /// Click a point given as window fractions.
    async fn click_ratio_point(&self, ratio: RatioPoint, at: Point) -> Result<()>;

    /// Park the pointer away from the board.
    async fn reset_pointer(&self, at: Point) -> Result<()>;
}

/// One actuator call, as recorded by [`RecordingActuator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Window focused
    Focus {
        /// Window origin on screen
        origin: Point,
    },
    /// Card clicked
    ClickCard {
        /// Clicked card
        card: CardId,
        /// Screen point
        at: Point,
    },
    /// Card dragged to the field
    DragToField {
        /// Dragged card
        card: CardId,
        /// Drag start
        from: Point,
        /// Drag end
        to: Point,
    },
    /// Card dragged onto another card
    DragOntoCard {
        /// Dragged card
        card: CardId,
        /// Card dropped on
        target: CardId,
        /// Drag start
        from: Point,
        /// Drag end
        to: Point,
    },
    /// Commit pressed
    Commit,
    /// Ratio point clicked
    ClickRatio {
        /// Window fractions
        ratio: RatioPoint,
        /// Resolved screen point
        at: Point,
    },
    /// Pointer parked
    ResetPointer {
        /// Screen point
        at: Point,
    },
}

impl Action {
    /// Whether this is a commit press.
    pub fn is_commit(&self) -> bool {
        matches!(self, Action::Commit)
    }

    /// Whether this action changes the board or the menus.
    ///
    /// Focus and pointer parking are not.
    pub fn is_effective(&self) -> bool {
        !matches!(self, Action::Focus { .. } | Action::ResetPointer { .. })
    }
}

/// Actuator that logs and records every call without touching the OS.
///
/// Clones share the same log. This is the dry-run backend and the test
/// double for scenario tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl RecordingActuator {
    /// Create an actuator with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded action, oldest first.
    pub fn actions(&self) -> Vec<Action> {
        self.actions
            .lock()
            .map(|actions| actions.clone())
            .unwrap_or_default()
    }

    /// Recorded actions that change the board or the menus.
    pub fn effective_actions(&self) -> Vec<Action> {
        self.actions()
            .into_iter()
            .filter(Action::is_effective)
            .collect()
    }

    /// Number of commit presses recorded.
    pub fn commits(&self) -> usize {
        self.actions().iter().filter(|a| a.is_commit()).count()
    }

    /// Forget recorded actions.
    pub fn clear(&self) {
        if let Ok(mut actions) = self.actions.lock() {
            actions.clear();
        }
    }

    fn record(&self, action: Action) -> Result<()> {
        info!(action = ?action, "Actuator");
        self.actions
            .lock()
            .map_err(|_| lorbot_core::Error::Actuator("action log lock poisoned".into()))?
            .push(action);
        Ok(())
    }
}

#[async_trait]
impl Actuator for RecordingActuator {
    async fn focus(&self, window: &WindowInfo) -> Result<()> {
        self.record(Action::Focus {
            origin: window.geometry.origin,
        })
    }

    async fn click_card(&self, card: CardId, at: Point) -> Result<()> {
        self.record(Action::ClickCard { card, at })
    }

    async fn drag_card_to_field(&self, card: CardId, from: Point, to: Point) -> Result<()> {
        self.record(Action::DragToField { card, from, to })
    }

    async fn drag_card_onto_card(
        &self,
        card: CardId,
        target: CardId,
        from: Point,
        to: Point,
    ) -> Result<()> {
        self.record(Action::DragOntoCard {
            card,
            target,
            from,
            to,
        })
    }

    async fn press_commit(&self) -> Result<()> {
        self.record(Action::Commit)
    }

    async fn click_ratio_point(&self, ratio: RatioPoint, at: Point) -> Result<()> {
        self.record(Action::ClickRatio { ratio, at })
    }

    async fn reset_pointer(&self, at: Point) -> Result<()> {
        self.record(Action::ResetPointer { at })
    }
}

/// Resolves cards and navigation targets to screen coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMapper<'a> {
    geometry: WindowGeometry,
    navigation: &'a NavigationSettings,
}

impl<'a> ScreenMapper<'a> {
    /// Create a mapper for the current window placement.
    pub fn new(geometry: WindowGeometry, navigation: &'a NavigationSettings) -> Self {
        Self {
            geometry,
            navigation,
        }
    }

    /// Where a card is grabbed: the middle of its top edge.
    pub fn card_point(&self, card: &CardRecord) -> Point {
        self.geometry.to_screen(card.top_center())
    }

    /// Where a card dragged to the field is dropped.
    pub fn field_point(&self, card: &CardRecord) -> Point {
        let lift = (self.navigation.play_drag * self.geometry.size.height as f64).round() as i32;
        let start = card.top_center();
        self.geometry.to_screen(Point::new(start.x, start.y - lift))
    }

    /// A ratio point on screen.
    pub fn ratio_point(&self, ratio: RatioPoint) -> Point {
        self.geometry.ratio_to_screen(ratio)
    }

    /// Where the pointer rests between actions.
    pub fn rest_point(&self) -> Point {
        self.ratio_point(self.navigation.pointer_rest)
    }
}
