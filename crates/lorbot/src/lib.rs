//! # lorbot
//!
//! Dry-run harness for the lorbot autopilot.
//!
//! ## Overview
//!
//! The binary wires the engine to offline sources:
//! - Frames replayed from a directory of PNG captures
//! - Telemetry from the loopback client API or a JSON lines recording
//! - A recording actuator that logs every action instead of performing it
//!
//! Live capture and input backends are supplied by embedders through
//! [`lorbot_capture::CaptureProvider`] and [`lorbot_orchestrator::Actuator`].
//!
//! ## Architecture
//!
//! This is Layer 4 - the binary that ties together:
//! - lorbot-core: Types and configuration
//! - lorbot-capture: Frames and telemetry
//! - lorbot-inference: Snapshot and phase inference
//! - lorbot-orchestrator: Strategy, actuation and the run loop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod cli;

pub use app::{
    build_orchestrator, config_schema, init_logging, load_config, sync_pause, watch_pause_file,
};
pub use cli::{Cli, RotationArg};
