//! Capture providers backed by stored frames.

use async_trait::async_trait;
use lorbot_core::{Error, Point, Result, WindowGeometry};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::frame::Frame;
use crate::provider::{CaptureProvider, WindowInfo};

/// Replays PNG frames from a directory in file name order.
///
/// Each call to [`CaptureProvider::frames`] advances by one file and wraps
/// around at the end; all frames of one poll are the same picture.
#[derive(Debug)]
pub struct DirectoryReplay {
    frames: Vec<Frame>,
    cursor: AtomicUsize,
}

impl DirectoryReplay {
    /// Load every `.png` file in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(Error::Capture(format!(
                "no PNG frames in {}",
                dir.display()
            )));
        }

        let frames = paths
            .iter()
            .map(Frame::open)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = frames.len(), dir = %dir.display(), "Loaded replay frames");

        Ok(Self {
            frames,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of stored frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames are stored.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn current(&self) -> &Frame {
        let index = self.cursor.load(Ordering::Relaxed) % self.frames.len();
        &self.frames[index]
    }
}

#[async_trait]
impl CaptureProvider for DirectoryReplay {
    async fn window(&self) -> Result<WindowInfo> {
        Ok(WindowInfo {
            geometry: WindowGeometry::new(Point::default(), self.current().size()),
            foreground: true,
        })
    }

    async fn frames(&self, count: usize, delay: Duration) -> Result<Vec<Frame>> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.frames.len();
        let mut frames = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                tokio::time::sleep(delay).await;
            }
            frames.push(self.frames[index].clone());
        }
        Ok(frames)
    }
}

/// Provider returning one replaceable still frame.
///
/// Clones share the same frame, so a test can swap the picture while the
/// observer holds the provider.
#[derive(Debug, Clone)]
pub struct StillCapture {
    frame: Arc<Mutex<Frame>>,
    origin: Point,
}

impl StillCapture {
    /// Create a provider showing `frame` at the screen origin.
    pub fn new(frame: Frame) -> Self {
        Self {
            frame: Arc::new(Mutex::new(frame)),
            origin: Point::default(),
        }
    }

    /// Place the window at `origin` on screen.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Replace the frame returned by later captures.
    pub fn set_frame(&self, frame: Frame) {
        if let Ok(mut current) = self.frame.lock() {
            *current = frame;
        }
    }

    fn snapshot(&self) -> Result<Frame> {
        self.frame
            .lock()
            .map(|frame| frame.clone())
            .map_err(|_| Error::Capture("still frame lock poisoned".into()))
    }
}

#[async_trait]
impl CaptureProvider for StillCapture {
    async fn window(&self) -> Result<WindowInfo> {
        let size = self.snapshot()?.size();
        if size.is_empty() {
            return Err(Error::WindowNotFound);
        }
        Ok(WindowInfo {
            geometry: WindowGeometry::new(self.origin, size),
            foreground: true,
        })
    }

    async fn frames(&self, count: usize, _delay: Duration) -> Result<Vec<Frame>> {
        let frame = self.snapshot()?;
        Ok(vec![frame; count])
    }
}
