//! # lorbot-core
//!
//! Core types for lorbot.
//!
//! This crate contains the fundamental types with **no internal dependencies**
//! on other lorbot crates. It provides:
//!
//! - Geometry types (Point, Size, Rect, ratio rectangles, window geometry)
//! - Card types (static catalog attributes, tracked card records)
//! - Board zones, game phases and resource counters
//! - The board snapshot produced by the card tracker
//! - Telemetry wire models
//! - Configuration and calibration data
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other lorbot crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod card;
pub mod config;
pub mod error;
pub mod geometry;
pub mod phase;
pub mod resources;
pub mod snapshot;
pub mod telemetry;
pub mod zone;

// Re-export commonly used types
pub use card::{CardId, CardRecord, CardStats, CardType, Keyword, StaticCardAttrs};
pub use config::{
    BotConfig, BotSettings, Calibration, ClientSettings, Hsv, HsvRange, Jitter,
    NamedHsvRange, NavigationSettings, PhaseCalibration, PixelWindow, RegionCalibration,
    ResourceCalibration, Rotation, StatsCalibration, TimingSettings, ZoneBand, ZoneCalibration,
};
pub use error::{Error, Result};
pub use geometry::{AnchoredRect, Point, RatioPoint, RatioRect, RatioSize, Rect, Size, WindowGeometry};
pub use phase::Phase;
pub use resources::{ResourceState, MAX_SPELL_MANA};
pub use snapshot::BoardSnapshot;
pub use telemetry::{ActiveDeck, CardPositions, MatchResult, RawRectangle, ScreenSize};
pub use zone::Zone;
