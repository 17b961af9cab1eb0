//! Datagram sources.
//!
//! A source yields `(sender, payload)` pairs in arrival order. Capture files
//! are the only file-backed source; live sockets are driven by the CLI.

pub mod pcap;
pub mod udp;

use std::net::SocketAddr;

use thiserror::Error;

pub use pcap::PcapFileSource;
pub use pcap::parser::CaptureCounters;

/// A UDP payload addressed to the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Datagram {
    /// Capture timestamp in seconds since the Unix epoch, when known.
    pub ts: Option<f64>,
    pub sender: SocketAddr,
    pub payload: Vec<u8>,
}

pub trait DatagramSource {
    fn next_datagram(&mut self) -> Result<Option<Datagram>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}
