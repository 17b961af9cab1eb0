//! Packet dispatch.
//!
//! `ArtNetNode` takes one datagram at a time, classifies it, and either
//! returns reply datagrams (ArtPoll), hands the decoded frame to its
//! [`FrameSink`] (ArtDmx, ArtSync), or drops it. It never touches sockets:
//! callers feed `(payload, sender)` pairs and transmit the returned
//! [`Outbound`] datagrams themselves, fire-and-forget.

mod sink;

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::node::{ActivityIndicators, NodeIdentity};
use crate::protocols::artnet::{ArtNetError, ArtPacket, build_poll_replies, layout, parse_packet};
use crate::routing::RoutingOutcome;

pub use sink::{FrameSink, PixelSink};

/// Datagram to be sent by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub destination: SocketAddr,
    pub payload: Vec<u8>,
}

/// What happened to one datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// ArtPoll answered; one record per group of four ports.
    Reply(Vec<Outbound>),
    Routed(RoutingOutcome),
    Synced,
    /// Well-formed packet the node does not act on (ArtPollReply).
    Ignored,
    Dropped(ArtNetError),
}

/// Running counters, one per drop reason or handled packet kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    pub packets_total: u64,
    pub malformed: u64,
    pub unsupported_opcode: u64,
    pub polls: u64,
    pub poll_replies_sent: u64,
    pub poll_replies_ignored: u64,
    pub dmx_frames: u64,
    pub frames_out_of_range: u64,
    pub pixels_written: u64,
    pub pixels_skipped: u64,
    pub syncs: u64,
}

/// The protocol engine for one node.
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
///
/// use artnode_core::protocols::artnet::writer::encode_artdmx;
/// use artnode_core::{ArtNetNode, Dispatch, NodeIdentity, PixelSink, Rgb, UniverseMap};
///
/// let map = UniverseMap::new(0, 2, 5, 340).unwrap();
/// let identity = NodeIdentity::new("Light Node", "Art-Net Light Node",
///     Ipv4Addr::new(192, 168, 1, 116), [0; 6], &map);
/// let mut node = ArtNetNode::new(identity, PixelSink::new(map));
///
/// let packet = encode_artdmx(0, 1, &[255, 0, 0]);
/// let sender = "192.168.1.10:6454".parse().unwrap();
/// assert!(matches!(node.handle_packet(&packet, sender), Dispatch::Routed(_)));
/// assert_eq!(node.sink().frame_buffer().snapshot(0).unwrap()[0], Rgb::new(255, 0, 0));
/// ```
#[derive(Debug)]
pub struct ArtNetNode<S> {
    identity: NodeIdentity,
    sink: S,
    stats: NodeStats,
    activity: ActivityIndicators,
}

impl<S: FrameSink> ArtNetNode<S> {
    pub fn new(identity: NodeIdentity, sink: S) -> Self {
        Self {
            identity,
            sink,
            stats: NodeStats::default(),
            activity: ActivityIndicators::new(),
        }
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// Handle on the activity flags, for a periodic status ticker.
    pub fn activity(&self) -> ActivityIndicators {
        self.activity.clone()
    }

    pub fn handle_packet(&mut self, payload: &[u8], sender: SocketAddr) -> Dispatch {
        self.stats.packets_total += 1;

        let packet = match parse_packet(payload) {
            Ok(packet) => packet,
            Err(err) => {
                if err.is_malformed() {
                    self.stats.malformed += 1;
                } else {
                    self.stats.unsupported_opcode += 1;
                }
                trace!(%sender, len = payload.len(), error = %err, "datagram dropped");
                return Dispatch::Dropped(err);
            }
        };

        match packet {
            ArtPacket::Poll => {
                self.stats.polls += 1;
                self.activity.mark_poll();
                let destination = SocketAddr::new(sender.ip(), layout::ARTNET_PORT);
                let replies: Vec<Outbound> = build_poll_replies(&self.identity)
                    .iter()
                    .map(|reply| Outbound {
                        destination,
                        payload: reply.to_bytes(),
                    })
                    .collect();
                self.stats.poll_replies_sent += replies.len() as u64;
                debug!(%sender, records = replies.len(), "answering ArtPoll");
                Dispatch::Reply(replies)
            }
            ArtPacket::PollReply => {
                self.stats.poll_replies_ignored += 1;
                trace!(%sender, "ignoring ArtPollReply");
                Dispatch::Ignored
            }
            ArtPacket::Dmx(frame) => {
                self.stats.dmx_frames += 1;
                self.activity.mark_dmx();
                let outcome = self.sink.on_dmx(&frame, sender);
                match outcome {
                    RoutingOutcome::Applied {
                        written, skipped, ..
                    } => {
                        self.stats.pixels_written += written as u64;
                        self.stats.pixels_skipped += skipped as u64;
                    }
                    RoutingOutcome::OutOfRange { universe } => {
                        self.stats.frames_out_of_range += 1;
                        debug!(%sender, universe, "ArtDmx universe outside output range");
                    }
                }
                Dispatch::Routed(outcome)
            }
            ArtPacket::Sync => {
                self.stats.syncs += 1;
                self.sink.on_sync(sender);
                Dispatch::Synced
            }
        }
    }
}
