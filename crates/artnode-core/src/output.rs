//! Output drivers and render pacing.
//!
//! A driver pushes the frame buffer to hardware (or anywhere else). The
//! [`RenderClock`] decides when: immediately after an ArtSync, otherwise at
//! the configured update rate.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use crate::engine::PixelSink;
use crate::routing::FrameBuffer;

pub trait OutputDriver {
    type Error: std::error::Error + Send + Sync + 'static;

    fn show(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;
}

/// Driver that only counts pushes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingDriver {
    pub frames_shown: u64,
}

impl OutputDriver for CountingDriver {
    type Error = Infallible;

    fn show(&mut self, _frame: &FrameBuffer) -> Result<(), Self::Error> {
        self.frames_shown += 1;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RenderClock {
    interval: Duration,
    last_render: Option<Instant>,
}

impl RenderClock {
    /// A non-positive rate never renders on its own; only syncs do.
    pub fn new(update_hz: f64) -> Self {
        let interval = Duration::try_from_secs_f64(1.0 / update_hz).unwrap_or(Duration::MAX);
        Self {
            interval,
            last_render: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns whether a render is due at `now`, and if so records it.
    pub fn should_render(&mut self, now: Instant, sync: bool) -> bool {
        let due = sync
            || match self.last_render {
                None => true,
                Some(last) => now.saturating_duration_since(last) >= self.interval,
            };
        if due {
            self.last_render = Some(now);
        }
        due
    }

    /// Time left before the periodic render is due.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last_render {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    /// Consume any pending sync from `sink` and push its buffer to `driver`
    /// when due. Returns whether a frame was shown.
    pub fn tick<D: OutputDriver>(
        &mut self,
        now: Instant,
        sink: &mut PixelSink,
        driver: &mut D,
    ) -> Result<bool, D::Error> {
        let sync = sink.take_sync();
        if !self.should_render(now, sync) {
            return Ok(false);
        }
        driver.show(sink.frame_buffer())?;
        Ok(true)
    }
}
