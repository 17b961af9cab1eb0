//! Art-Net codec.
//!
//! The parser checks size bounds and the eight-byte `Art-Net\0` identifier,
//! classifies the opcode, and decodes ArtDmx frames as borrowed views of the
//! datagram. ArtDmx length is taken verbatim from the wire; range checks
//! against the pixel layout belong to the router.
//!
//! ArtPollReply records are assembled from the node identity and serialized
//! field by field against the offsets in `layout`; the same offsets drive
//! parsing, so a record always reads back as written.

pub mod error;
pub mod layout;
pub mod parser;
pub mod poll_reply;
pub mod reader;
pub mod writer;

pub use error::ArtNetError;
pub use parser::{ArtPacket, DmxFrame, Opcode, classify, parse_artdmx, parse_packet};
pub use poll_reply::{PollReply, build_poll_replies};
