//! Universe-to-pixel routing.
//!
//! A `UniverseMap` describes how consecutive DMX universes are laid out over
//! the physical outputs; the `UniverseRouter` applies ArtDmx frames to the
//! `FrameBuffer` according to that map. Whole frames outside the map are
//! dropped; pixels past the end of a strip are skipped one by one.

pub mod error;
pub mod frame_buffer;
pub mod router;
pub mod universes;

pub use error::MapError;
pub use frame_buffer::{FrameBuffer, Rgb};
pub use router::{RoutingOutcome, UniverseRouter};
pub use universes::{CHANNELS_PER_PIXEL, MAX_OUTPUTS, PIXELS_PER_UNIVERSE, UniverseMap};
