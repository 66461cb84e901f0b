//! Capture provider interface.

use async_trait::async_trait;
use lorbot_core::{Result, WindowGeometry};
use std::time::Duration;

use crate::frame::Frame;

/// Game window placement and focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    /// Window position and size on screen
    pub geometry: WindowGeometry,
    /// Whether the window has input focus
    pub foreground: bool,
}

/// Source of game window frames.
///
/// Implementations capture the window's bounds only. Returning
/// [`lorbot_core::Error::WindowNotFound`] or [`lorbot_core::Error::Capture`]
/// skips the current refresh.
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// Locate the game window.
    async fn window(&self) -> Result<WindowInfo>;

    /// Capture `count` sequential frames, `delay` apart.
    async fn frames(&self, count: usize, delay: Duration) -> Result<Vec<Frame>>;
}
