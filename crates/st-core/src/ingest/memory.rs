//! In-memory batch source for replay and tests.

use st_common::Result;
use st_frame::DataFrame;

use super::BatchSource;

/// Serves a pre-built list of frames, consuming them as they are
/// delivered. Tracks `load` invocations so callers can assert that a bad
/// config never opened the source.
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: Vec<DataFrame>,
    load_calls: usize,
}

impl MemorySource {
    pub fn new(frames: Vec<DataFrame>) -> Self {
        Self {
            frames,
            load_calls: 0,
        }
    }

    /// How many times `load` has been invoked.
    pub fn load_calls(&self) -> usize {
        self.load_calls
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl BatchSource for MemorySource {
    fn load(&mut self, handler: &mut dyn FnMut(DataFrame) -> Result<()>) -> Result<()> {
        self.load_calls += 1;
        while !self.frames.is_empty() {
            let frame = self.frames.remove(0);
            handler(frame)?;
        }
        Ok(())
    }
}
