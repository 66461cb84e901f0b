//! # lorbot-inference
//!
//! State inference engine for lorbot.
//!
//! This crate turns raw frames and telemetry into a canonical board snapshot
//! and a discrete game phase:
//! - Component locator resolving calibrated screen regions
//! - Zone classifier for telemetry rectangles
//! - Card catalog lookup and the local set-file catalog
//! - Attack/health recognition through color-mask hypotheses
//! - Card tracker reconciling rectangles with tracked records
//! - Mana and spell mana readers
//! - Priority-ordered phase rule cascade
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on lorbot-core and
//! lorbot-capture. Everything here is synchronous and free of I/O apart from
//! catalog and template loading.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod locator;
pub mod phase;
pub mod resources;
pub mod rules;
pub mod stats;
pub mod testing;
pub mod tracker;
pub mod zones;

// Re-export commonly used types
pub use catalog::{CardCatalog, LocalCardCatalog, MemoryCatalog};
pub use locator::ComponentLocator;
pub use phase::{MatchLedger, PhaseCascade, PhaseContext, PhaseInference, PhaseRule};
pub use resources::{ManaReader, ManaReading, ManaTemplate, ManaTemplates, SpellManaReader};
pub use rules::{
    AttackTokenRule, BlockingRule, BusyRule, HoldRule, MenusRule, MulliganRule, OpponentTurnRule,
};
pub use stats::{DigitReading, DigitRecognizer, NoopRecognizer, StatsReader};
pub use tracker::CardTracker;
pub use zones::ZoneClassifier;
