//! Capture file source.
//!
//! Reads pcap or pcapng files frame by frame and yields the UDP datagrams
//! addressed to the Art-Net port, in capture order.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
