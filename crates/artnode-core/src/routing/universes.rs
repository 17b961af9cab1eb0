use super::error::MapError;
use crate::protocols::artnet::layout::DMX_UNIVERSE_SIZE;

pub const CHANNELS_PER_PIXEL: usize = 3;

/// Pixels addressable by one universe. 512 / 3 truncates, so the last two
/// channels of every universe never reach a pixel.
pub const PIXELS_PER_UNIVERSE: usize = DMX_UNIVERSE_SIZE / CHANNELS_PER_PIXEL;

/// Upper bound on outputs. Every output may need its own ArtPollReply record,
/// and the bind index numbering them is one byte starting at 1.
pub const MAX_OUTPUTS: u16 = 255;

/// Layout of consecutive universes over the physical outputs.
///
/// Output `k` consumes universes `start + k * per_output ..
/// start + (k + 1) * per_output`; within an output, sub-universe `s` starts
/// at pixel `s * PIXELS_PER_UNIVERSE`.
///
/// # Examples
/// ```
/// use artnode_core::UniverseMap;
///
/// let map = UniverseMap::new(0, 2, 5, 340).unwrap();
/// assert_eq!(map.locate(3), Some((1, 170)));
/// assert_eq!(map.locate(10), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniverseMap {
    start_universe: u16,
    universes_per_output: u16,
    number_of_outputs: u16,
    pixels_per_output: usize,
}

impl UniverseMap {
    pub fn new(
        start_universe: u16,
        universes_per_output: u16,
        number_of_outputs: u16,
        pixels_per_output: usize,
    ) -> Result<Self, MapError> {
        if universes_per_output == 0 {
            return Err(MapError::ZeroUniversesPerOutput);
        }
        if number_of_outputs > MAX_OUTPUTS {
            return Err(MapError::TooManyOutputs {
                outputs: number_of_outputs,
                max: MAX_OUTPUTS,
            });
        }

        let addressable = universes_per_output as usize * PIXELS_PER_UNIVERSE;
        if pixels_per_output > addressable {
            return Err(MapError::NotEnoughUniverses {
                pixels: pixels_per_output,
                universes: universes_per_output,
                addressable,
            });
        }

        let span = number_of_outputs as u32 * universes_per_output as u32;
        if span > 0 {
            let last = start_universe as u32 + span - 1;
            if last > u16::MAX as u32 {
                return Err(MapError::UniverseOverflow { last });
            }
        }

        Ok(Self {
            start_universe,
            universes_per_output,
            number_of_outputs,
            pixels_per_output,
        })
    }

    pub fn start_universe(&self) -> u16 {
        self.start_universe
    }

    pub fn universes_per_output(&self) -> u16 {
        self.universes_per_output
    }

    pub fn number_of_outputs(&self) -> u16 {
        self.number_of_outputs
    }

    pub fn pixels_per_output(&self) -> usize {
        self.pixels_per_output
    }

    pub fn universe_count(&self) -> u32 {
        self.number_of_outputs as u32 * self.universes_per_output as u32
    }

    /// First universe of each output. Fits in `u16` by construction.
    pub fn output_universes(&self) -> Vec<u16> {
        (0..self.number_of_outputs)
            .map(|output| {
                (self.start_universe as u32 + output as u32 * self.universes_per_output as u32)
                    as u16
            })
            .collect()
    }

    /// Strip index and first pixel for `universe`, or `None` when the
    /// universe is not mapped to any output.
    pub fn locate(&self, universe: u16) -> Option<(usize, usize)> {
        let relative = universe.checked_sub(self.start_universe)?;
        let strip = relative / self.universes_per_output;
        if strip >= self.number_of_outputs {
            return None;
        }
        let sub_universe = relative % self.universes_per_output;
        Some((strip as usize, sub_universe as usize * PIXELS_PER_UNIVERSE))
    }
}
