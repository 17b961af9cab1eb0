use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Pixel storage, one fixed-length strip per physical output.
///
/// Writes come from the router only; output drivers read through
/// [`FrameBuffer::snapshot`]. There is a single buffer, so a driver reading
/// while a frame is being applied may observe a partially updated strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    strips: Vec<Vec<Rgb>>,
    pixels_per_strip: usize,
}

impl FrameBuffer {
    pub fn new(strip_count: usize, pixels_per_strip: usize) -> Self {
        Self {
            strips: vec![vec![Rgb::BLACK; pixels_per_strip]; strip_count],
            pixels_per_strip,
        }
    }

    pub fn strip_count(&self) -> usize {
        self.strips.len()
    }

    pub fn pixels_per_strip(&self) -> usize {
        self.pixels_per_strip
    }

    /// Read-only view of one strip.
    pub fn snapshot(&self, strip: usize) -> Option<&[Rgb]> {
        self.strips.get(strip).map(Vec::as_slice)
    }

    /// Returns `false` (and writes nothing) when the position is outside the
    /// buffer.
    pub(crate) fn write(&mut self, strip: usize, pixel: usize, rgb: Rgb) -> bool {
        match self
            .strips
            .get_mut(strip)
            .and_then(|pixels| pixels.get_mut(pixel))
        {
            Some(slot) => {
                *slot = rgb;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        for strip in &mut self.strips {
            strip.fill(Rgb::BLACK);
        }
    }

    /// Lowercase `rrggbb` hex for every pixel of `strip`.
    pub fn strip_hex(&self, strip: usize) -> Option<String> {
        self.snapshot(strip).map(|pixels| {
            pixels
                .iter()
                .map(|p| format!("{:02x}{:02x}{:02x}", p.r, p.g, p.b))
                .collect()
        })
    }
}
