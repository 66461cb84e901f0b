//! Telemetry poll recording and replay.
//!
//! Polls are stored as JSON lines, one response per line:
//!
//! ```text
//! {"time":0.012,"endpoint":"card_positions","body":{"PlayerName":null,...}}
//! {"time":0.015,"endpoint":"match_result","body":{"GameID":-1,"LocalPlayerWon":false}}
//! ```
//!
//! Combined with [`crate::DirectoryReplay`] a recording gives a fully offline
//! dry run of the bot.

use async_trait::async_trait;
use lorbot_core::{ActiveDeck, CardPositions, Error, MatchResult, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Instant;
use tracing::warn;

use crate::telemetry::TelemetryFeed;

/// Telemetry endpoint a poll came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Card rectangles
    CardPositions,
    /// Active deck
    ActiveDeck,
    /// Match result
    MatchResult,
}

/// One recorded telemetry response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoll {
    /// Seconds since the recording started
    pub time: f64,
    /// Source endpoint
    pub endpoint: Endpoint,
    /// Decoded response body
    pub body: serde_json::Value,
}

/// Feed wrapper that writes every successful response as a JSON line.
///
/// Write failures are logged and never fail the poll.
pub struct RecordingTelemetry<F> {
    inner: F,
    sink: Mutex<Box<dyn Write + Send>>,
    start: Instant,
}

impl<F: TelemetryFeed> RecordingTelemetry<F> {
    /// Record `inner` into `writer`.
    pub fn new(inner: F, writer: impl Write + Send + 'static) -> Self {
        Self {
            inner,
            sink: Mutex::new(Box::new(writer)),
            start: Instant::now(),
        }
    }

    /// Record `inner` into a newly created file.
    pub fn create(inner: F, path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(inner, BufWriter::new(file)))
    }

    fn record<T: Serialize>(&self, endpoint: Endpoint, value: &T) {
        let poll = match serde_json::to_value(value) {
            Ok(body) => TelemetryPoll {
                time: self.start.elapsed().as_secs_f64(),
                endpoint,
                body,
            },
            Err(e) => {
                warn!("Failed to encode telemetry poll: {}", e);
                return;
            }
        };

        let Ok(mut sink) = self.sink.lock() else {
            warn!("Telemetry recording sink poisoned");
            return;
        };
        let written = serde_json::to_writer(&mut *sink, &poll)
            .map_err(Error::from)
            .and_then(|_| writeln!(sink).map_err(Error::from))
            .and_then(|_| sink.flush().map_err(Error::from));
        if let Err(e) = written {
            warn!("Failed to write telemetry poll: {}", e);
        }
    }
}

#[async_trait]
impl<F: TelemetryFeed> TelemetryFeed for RecordingTelemetry<F> {
    async fn card_positions(&self) -> Result<CardPositions> {
        let positions = self.inner.card_positions().await?;
        self.record(Endpoint::CardPositions, &positions);
        Ok(positions)
    }

    async fn active_deck(&self) -> Result<ActiveDeck> {
        let deck = self.inner.active_deck().await?;
        self.record(Endpoint::ActiveDeck, &deck);
        Ok(deck)
    }

    async fn match_result(&self) -> Result<MatchResult> {
        let result = self.inner.match_result().await?;
        self.record(Endpoint::MatchResult, &result);
        Ok(result)
    }
}

/// Feed serving recorded polls in order, per endpoint.
///
/// Once an endpoint's polls are exhausted its last response repeats. An
/// endpoint that was never recorded fails like an unreachable client.
#[derive(Debug, Default)]
pub struct ReplayTelemetry {
    queues: Mutex<HashMap<Endpoint, VecDeque<serde_json::Value>>>,
}

impl ReplayTelemetry {
    /// Build a replay from polls.
    pub fn from_polls(polls: impl IntoIterator<Item = TelemetryPoll>) -> Self {
        let mut queues: HashMap<Endpoint, VecDeque<serde_json::Value>> = HashMap::new();
        for poll in polls {
            queues.entry(poll.endpoint).or_default().push_back(poll.body);
        }
        Self {
            queues: Mutex::new(queues),
        }
    }

    /// Load a JSON lines recording.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Number of polls left for an endpoint (the repeating last one included).
    pub fn remaining(&self, endpoint: Endpoint) -> usize {
        self.queues
            .lock()
            .map(|q| q.get(&endpoint).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }

    fn next<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let body = {
            let mut queues = self
                .queues
                .lock()
                .map_err(|_| Error::Telemetry("replay queue poisoned".into()))?;
            let queue = queues
                .get_mut(&endpoint)
                .filter(|q| !q.is_empty())
                .ok_or_else(|| Error::Telemetry(format!("no recorded {endpoint:?} polls")))?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        let body = body.ok_or_else(|| Error::Telemetry(format!("no recorded {endpoint:?} polls")))?;
        serde_json::from_value(body)
            .map_err(|e| Error::Telemetry(format!("recorded {endpoint:?} poll is invalid: {e}")))
    }
}

impl FromStr for ReplayTelemetry {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        let polls = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str::<TelemetryPoll>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::from_polls(polls))
    }
}

#[async_trait]
impl TelemetryFeed for ReplayTelemetry {
    async fn card_positions(&self) -> Result<CardPositions> {
        self.next(Endpoint::CardPositions)
    }

    async fn active_deck(&self) -> Result<ActiveDeck> {
        self.next(Endpoint::ActiveDeck)
    }

    async fn match_result(&self) -> Result<MatchResult> {
        self.next(Endpoint::MatchResult)
    }
}
