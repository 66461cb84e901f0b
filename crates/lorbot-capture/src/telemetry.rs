//! Telemetry feed interface.

use async_trait::async_trait;
use lorbot_core::{ActiveDeck, CardPositions, MatchResult, Result};

/// The game client's local telemetry API.
///
/// Every call is best-effort; a [`lorbot_core::Error::Telemetry`] failure
/// only skips the value for the current refresh.
#[async_trait]
pub trait TelemetryFeed: Send + Sync {
    /// Card rectangles and the coarse match state.
    async fn card_positions(&self) -> Result<CardPositions>;

    /// The active deck.
    async fn active_deck(&self) -> Result<ActiveDeck>;

    /// Result of the last finished match.
    async fn match_result(&self) -> Result<MatchResult>;
}
