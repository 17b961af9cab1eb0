//! Art-Net pixel node core library.
//!
//! A node receives Art-Net datagrams, answers discovery polls with
//! ArtPollReply records describing its outputs, and maps ArtDmx universes
//! onto per-output RGB pixel strips. The pipeline is codec
//! (layout/reader/parser) -> engine -> routing -> frame buffer; sockets
//! and capture files stay at the edges (`source`, the CLI), so every stage
//! can be driven from a byte slice.
//!
//! Invariants:
//! - Malformed or unsupported datagrams are dropped without touching the
//!   frame buffer.
//! - Frames are applied in arrival order; sequence numbers never reorder.
//! - A frame never writes past the end of its own strip.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use artnode_core::{NodeConfig, replay_pcap_file};
//!
//! let report = replay_pcap_file(Path::new("show.pcapng"), &NodeConfig::default())?;
//! println!("dmx frames: {}", report.stats.dmx_frames);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod config;
pub mod engine;
pub mod node;
pub mod output;
pub mod protocols;
pub mod replay;
pub mod routing;
pub mod source;

pub use config::{ConfigError, NodeConfig};
pub use engine::{ArtNetNode, Dispatch, FrameSink, NodeStats, Outbound, PixelSink};
pub use node::{ActivityIndicators, ActivitySample, LocalIp, NodeIdentity};
pub use output::{CountingDriver, OutputDriver, RenderClock};
pub use protocols::artnet::{ArtNetError, ArtPacket, DmxFrame, Opcode, PollReply};
pub use replay::{ReplayError, replay_pcap_file, replay_source};
pub use routing::{FrameBuffer, MapError, Rgb, RoutingOutcome, UniverseMap, UniverseRouter};
pub use source::{Datagram, DatagramSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Used as `generated_at` when the capture carries no timestamps.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of replaying one capture through a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the last captured datagram, so reruns are identical.
    pub generated_at: String,
    pub input: InputInfo,
    pub capture_summary: CaptureSummary,
    pub node: NodeSummary,
    pub stats: NodeStats,
    /// One entry per output, in output order.
    pub strips: Vec<StripSnapshot>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use artnode_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "artnode".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "artnode");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided by the caller.
    pub path: String,
    pub bytes: u64,
}

/// Capture-level counters and time bounds.
///
/// # Examples
/// ```
/// use artnode_core::CaptureSummary;
///
/// let summary = CaptureSummary {
///     frames_total: Some(12),
///     undecodable_frames: None,
///     datagrams_total: 10,
///     time_start: None,
///     time_end: None,
/// };
/// let json = serde_json::to_string(&summary).unwrap();
/// assert!(!json.contains("time_start"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Packet records in the capture file; absent for non-file sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames_total: Option<u64>,
    /// Records that could not be sliced into IP/UDP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undecodable_frames: Option<u64>,
    /// Datagrams addressed to the Art-Net port.
    pub datagrams_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Identity of the replaying node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSummary {
    pub short_name: String,
    pub long_name: String,
    pub ip: String,
    pub universe_count: u32,
}

/// Final pixel content of one strip.
///
/// # Examples
/// ```
/// use artnode_core::StripSnapshot;
///
/// let strip = StripSnapshot {
///     strip: 0,
///     first_universe: 0,
///     last_sequence: None,
///     pixels: 1,
///     hex: "ff0000".to_string(),
/// };
/// assert_eq!(strip.hex.len(), strip.pixels * 6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripSnapshot {
    pub strip: usize,
    pub first_universe: u16,
    /// Sequence of the last frame seen on the strip's first universe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sequence: Option<u8>,
    pub pixels: usize,
    /// Lowercase `rrggbb` per pixel.
    pub hex: String,
}
