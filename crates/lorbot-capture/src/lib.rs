//! # lorbot-capture
//!
//! Signal sources for the lorbot inference engine.
//!
//! This crate provides:
//! - The [`Frame`] raster with the HSV-mask and edge primitives every probe
//!   is built from
//! - The [`CaptureProvider`] trait and replay providers for recorded frames
//! - The [`TelemetryFeed`] trait and the loopback HTTP client for the game
//!   client's local API
//! - Recording and replay of telemetry polls
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on lorbot-core and is
//! consumed by the inference and orchestration crates. Live OS capture
//! backends are supplied by embedders through [`CaptureProvider`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod color;
pub mod frame;
pub mod http;
pub mod provider;
pub mod recording;
pub mod replay;
pub mod telemetry;

// Re-export commonly used types
pub use color::rgb_to_hsv;
pub use frame::Frame;
pub use http::LoopbackTelemetry;
pub use provider::{CaptureProvider, WindowInfo};
pub use recording::{Endpoint, RecordingTelemetry, ReplayTelemetry, TelemetryPoll};
pub use replay::{DirectoryReplay, StillCapture};
pub use telemetry::TelemetryFeed;
