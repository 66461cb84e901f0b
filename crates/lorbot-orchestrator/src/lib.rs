//! # lorbot-orchestrator
//!
//! Turn orchestration for lorbot.
//!
//! This crate closes the loop between inference and input:
//! - [`GameObserver`] refreshes capture and telemetry into a snapshot, the
//!   resources and a phase, always in the same order
//! - [`Strategy`] takes the game decisions; [`GenericStrategy`] is the default
//! - [`Actuator`] performs them; [`RecordingActuator`] logs them for dry runs
//!   and tests
//! - [`TurnOrchestrator`] dispatches every phase to a bounded action sequence
//!   and runs until cancelled
//!
//! ## Architecture
//!
//! This is Layer 3 in the architecture - it depends on lorbot-core,
//! lorbot-capture and lorbot-inference. The binary wires concrete providers
//! into it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actuator;
pub mod generic;
pub mod memory;
pub mod navigation;
pub mod observer;
pub mod orchestrator;
pub mod poll;
pub mod strategy;

// Re-export commonly used types
pub use actuator::{Action, Actuator, RecordingActuator, ScreenMapper};
pub use generic::GenericStrategy;
pub use memory::TurnMemory;
pub use navigation::DeckSelectionRoute;
pub use observer::GameObserver;
pub use orchestrator::{TurnOrchestrator, MULLIGAN_HAND_SIZE};
pub use poll::{poll_observer, PollCondition, PollOutcome};
pub use strategy::{
    is_lane_taken, BlockPlan, CardTarget, GameView, GameplayAction, PlayChoice, Strategy,
};
