use std::collections::HashMap;

use tracing::trace;

use super::frame_buffer::{FrameBuffer, Rgb};
use super::universes::{CHANNELS_PER_PIXEL, UniverseMap};
use crate::protocols::artnet::DmxFrame;

/// Result of applying one ArtDmx frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingOutcome {
    /// Frame landed on `strip`; `written + skipped == length / 3`.
    Applied {
        strip: usize,
        first_pixel: usize,
        written: usize,
        skipped: usize,
    },
    /// Universe not mapped to any output; nothing was written.
    OutOfRange { universe: u16 },
}

/// Applies ArtDmx frames to the frame buffer it owns.
///
/// Sequence numbers are remembered per universe for inspection only: late,
/// duplicated or reordered frames are applied exactly like in-order ones.
#[derive(Debug)]
pub struct UniverseRouter {
    map: UniverseMap,
    buffer: FrameBuffer,
    last_sequence: HashMap<u16, u8>,
}

impl UniverseRouter {
    pub fn new(map: UniverseMap) -> Self {
        Self {
            buffer: FrameBuffer::new(map.number_of_outputs() as usize, map.pixels_per_output()),
            map,
            last_sequence: HashMap::new(),
        }
    }

    pub fn map(&self) -> &UniverseMap {
        &self.map
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn last_sequence(&self, universe: u16) -> Option<u8> {
        self.last_sequence.get(&universe).copied()
    }

    /// Set every pixel of every strip to black.
    pub fn blackout(&mut self) {
        self.buffer.clear();
    }

    pub fn route(&mut self, frame: &DmxFrame<'_>) -> RoutingOutcome {
        let Some((strip, first_pixel)) = self.map.locate(frame.universe) else {
            trace!(universe = frame.universe, "universe not mapped to an output");
            return RoutingOutcome::OutOfRange {
                universe: frame.universe,
            };
        };
        self.last_sequence.insert(frame.universe, frame.sequence);

        let mut written = 0;
        let mut skipped = 0;
        for (i, channels) in frame.data.chunks_exact(CHANNELS_PER_PIXEL).enumerate() {
            let rgb = Rgb::new(channels[0], channels[1], channels[2]);
            if self.buffer.write(strip, first_pixel + i, rgb) {
                written += 1;
            } else {
                skipped += 1;
            }
        }

        RoutingOutcome::Applied {
            strip,
            first_pixel,
            written,
            skipped,
        }
    }
}
