//! Drag preview capture
//!
//! A drag needs a snapshot of the dragged node. The renderer produces it
//! asynchronously, so the caller hands out a [`PreviewSender`] and waits a
//! bounded time for it to be completed. Each capture owns its own channel;
//! overlapping captures cannot see each other's pixels.

use std::sync::mpsc::{self, RecvTimeoutError, SyncSender};
use std::time::Duration;

use crate::error::{Error, Result};

/// RGBA8 snapshot of a node
#[derive(Clone, PartialEq, Eq)]
pub struct PixelMap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelMap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::PixelMapSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-color image, mostly useful as a placeholder
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl std::fmt::Debug for PixelMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelMap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Completes one capture, from any thread
#[derive(Debug)]
pub struct PreviewSender {
    tx: SyncSender<PixelMap>,
}

impl PreviewSender {
    /// Deliver the snapshot; false when the caller already gave up waiting
    pub fn send(self, pixel_map: PixelMap) -> bool {
        self.tx.try_send(pixel_map).is_ok()
    }
}

/// Ask `request` for a snapshot and wait at most `timeout` for it
///
/// Returns `None` when the sender is dropped unused or the timeout passes.
pub fn capture_drag_preview<F>(timeout: Duration, request: F) -> Option<PixelMap>
where
    F: FnOnce(PreviewSender),
{
    let (tx, rx) = mpsc::sync_channel(1);
    request(PreviewSender { tx });
    match rx.recv_timeout(timeout) {
        Ok(pixel_map) => {
            tracing::debug!(width = pixel_map.width, height = pixel_map.height, "drag preview captured");
            Some(pixel_map)
        }
        Err(RecvTimeoutError::Timeout) => {
            tracing::debug!(?timeout, "drag preview timed out");
            None
        }
        Err(RecvTimeoutError::Disconnected) => {
            tracing::debug!("drag preview request dropped");
            None
        }
    }
}
