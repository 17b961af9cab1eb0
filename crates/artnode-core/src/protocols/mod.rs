//! Protocol codecs.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets, ranges and wire constants (source of truth)
//! - `reader` / `writer`: bounds-checked byte access
//! - `parser`: classification and domain-level decoding
//! - `error`: explicit drop reasons
//!
//! Codecs are pure and perform no I/O.

pub mod artnet;
pub(crate) mod common;
