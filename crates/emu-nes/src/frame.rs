//! Handing finished frames to another thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A completed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 1 for the first frame after power-up.
    pub number: u64,
    /// 256x240 pixels, `0x00RRGGBB`.
    pub pixels: Vec<u32>,
}

/// Latest-frame slot shared between the emulation thread and a renderer.
///
/// The emulator overwrites the slot on every completed frame; `take`
/// empties it. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct FrameHandoff {
    slot: Arc<Mutex<Option<Frame>>>,
}

impl FrameHandoff {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Frame>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the pending frame, reusing its buffer when there is one.
    pub fn publish(&self, number: u64, pixels: &[u32]) {
        let mut slot = self.lock();
        match slot.as_mut() {
            Some(frame) => {
                frame.number = number;
                frame.pixels.clear();
                frame.pixels.extend_from_slice(pixels);
            }
            None => {
                *slot = Some(Frame {
                    number,
                    pixels: pixels.to_vec(),
                });
            }
        }
    }

    /// Take the pending frame, if one was published since the last take.
    #[must_use]
    pub fn take(&self) -> Option<Frame> {
        self.lock().take()
    }
}
