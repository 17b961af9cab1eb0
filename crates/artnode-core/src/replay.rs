//! Offline replay of captured Art-Net traffic.
//!
//! Every datagram of a capture is fed through a fresh [`ArtNetNode`] in
//! capture order; the report records what the node did and what its strips
//! look like at the end. Poll replies are counted but never transmitted.

use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use crate::config::{ConfigError, NodeConfig};
use crate::engine::{ArtNetNode, PixelSink};
use crate::source::{Datagram, DatagramSource, PcapFileSource, SourceError};
use crate::{
    CaptureSummary, DEFAULT_GENERATED_AT, InputInfo, NodeSummary, REPORT_VERSION, ReplayReport,
    StripSnapshot, ToolInfo,
};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub fn replay_pcap_file(path: &Path, config: &NodeConfig) -> Result<ReplayReport, ReplayError> {
    let input = InputInfo {
        path: path.display().to_string(),
        bytes: path.metadata()?.len(),
    };
    let mut source = PcapFileSource::open(path)?;
    let mut report = replay_source(input, &mut source, config)?;

    let counters = source.counters();
    report.capture_summary.frames_total = Some(counters.frames);
    report.capture_summary.undecodable_frames = Some(counters.undecodable);
    Ok(report)
}

pub fn replay_source<S: DatagramSource>(
    input: InputInfo,
    source: &mut S,
    config: &NodeConfig,
) -> Result<ReplayReport, ReplayError> {
    let identity = config.identity()?;
    let map = config.universe_map()?;
    let mut node = ArtNetNode::new(identity, PixelSink::new(map));

    let mut datagrams_total = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;

    while let Some(Datagram {
        ts,
        sender,
        payload,
    }) = source.next_datagram()?
    {
        datagrams_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);
        node.handle_packet(&payload, sender);
    }
    debug!(datagrams_total, "replay finished");

    let capture_summary = CaptureSummary {
        frames_total: None,
        undecodable_frames: None,
        datagrams_total,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    };
    let generated_at = capture_summary
        .time_end
        .clone()
        .or_else(|| capture_summary.time_start.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());

    let identity = node.identity();
    let node_summary = NodeSummary {
        short_name: identity.short_name().to_string(),
        long_name: identity.long_name().to_string(),
        ip: identity.ip().to_string(),
        universe_count: identity.universe_count(),
    };
    let stats = node.stats().clone();
    let strips = strip_snapshots(node.sink());

    Ok(ReplayReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "artnode".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at,
        input,
        capture_summary,
        node: node_summary,
        stats,
        strips,
    })
}

fn strip_snapshots(sink: &PixelSink) -> Vec<StripSnapshot> {
    let router = sink.router();
    let buffer = router.frame_buffer();
    router
        .map()
        .output_universes()
        .into_iter()
        .enumerate()
        .map(|(strip, first_universe)| StripSnapshot {
            strip,
            first_universe,
            last_sequence: router.last_sequence(first_universe),
            pixels: buffer.pixels_per_strip(),
            hex: buffer.strip_hex(strip).unwrap_or_default(),
        })
        .collect()
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::net::SocketAddr;

    use super::{replay_source, ts_to_rfc3339, update_ts_bounds};
    use crate::config::NodeConfig;
    use crate::protocols::artnet::writer::{encode_artdmx, encode_poll, encode_sync};
    use crate::source::{Datagram, DatagramSource, SourceError};
    use crate::{DEFAULT_GENERATED_AT, InputInfo};

    struct VecSource(VecDeque<Datagram>);

    impl DatagramSource for VecSource {
        fn next_datagram(&mut self) -> Result<Option<Datagram>, SourceError> {
            Ok(self.0.pop_front())
        }
    }

    fn datagram(ts: Option<f64>, payload: Vec<u8>) -> Datagram {
        Datagram {
            ts,
            sender: "10.0.0.5:6454".parse::<SocketAddr>().unwrap(),
            payload,
        }
    }

    fn input() -> InputInfo {
        InputInfo {
            path: "memory".to_string(),
            bytes: 0,
        }
    }

    #[test]
    fn replay_counts_and_snapshots() {
        let mut source = VecSource(VecDeque::from(vec![
            datagram(Some(2.0), encode_poll()),
            datagram(Some(1.0), encode_artdmx(2, 7, &[0xff, 0x00, 0x10])),
            datagram(Some(3.0), encode_sync()),
            datagram(None, b"garbage".to_vec()),
        ]));
        let report = replay_source(input(), &mut source, &NodeConfig::default()).unwrap();

        assert_eq!(report.capture_summary.datagrams_total, 4);
        assert_eq!(
            report.capture_summary.time_start.as_deref(),
            Some("1970-01-01T00:00:01Z")
        );
        assert_eq!(report.generated_at, "1970-01-01T00:00:03Z");
        assert_eq!(report.stats.polls, 1);
        assert_eq!(report.stats.poll_replies_sent, 2);
        assert_eq!(report.stats.syncs, 1);
        assert_eq!(report.stats.malformed, 1);
        assert_eq!(report.strips.len(), 5);
        assert_eq!(report.strips[1].first_universe, 2);
        assert_eq!(report.strips[1].last_sequence, Some(7));
        assert!(report.strips[1].hex.starts_with("ff0010000000"));
        assert_eq!(report.strips[1].hex.len(), 340 * 6);
        assert_eq!(report.node.universe_count, 10);
    }

    #[test]
    fn empty_source_uses_default_timestamp() {
        let mut source = VecSource(VecDeque::new());
        let report = replay_source(input(), &mut source, &NodeConfig::default()).unwrap();
        assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);
        assert!(report.capture_summary.time_start.is_none());
    }

    #[test]
    fn ts_bounds_ignore_missing_timestamps() {
        let mut first = None;
        let mut last = None;
        update_ts_bounds(&mut first, &mut last, Some(5.0));
        update_ts_bounds(&mut first, &mut last, None);
        update_ts_bounds(&mut first, &mut last, Some(4.0));
        assert_eq!((first, last), (Some(4.0), Some(5.0)));
    }

    #[test]
    fn rfc3339_formatting() {
        assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(ts_to_rfc3339(None), None);
    }
}
