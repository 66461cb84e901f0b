//! Testing utilities for lorbot inference.
//!
//! Provides synthetic frames that satisfy specific probes and fixture
//! builders for cards and telemetry rectangles.

pub mod fixtures;
pub mod frames;

pub use fixtures::{card, positions, raw, spell, telemetry_y};
pub use frames::{FrameBuilder, ATTACK_TOKEN, DECK_EDIT, ROUNDS_LOG, SPELL_MANA, TURN_READY};
