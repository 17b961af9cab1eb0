//! Live node on a UDP socket.
//!
//! The main loop receives one datagram at a time, hands it to the node, sends
//! any poll replies straight back, and lets the render clock push the frame
//! buffer to the output driver. A second thread only samples the activity
//! flags; it never touches the frame buffer.

use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use artnode_core::protocols::artnet::layout::MAX_PACKET_LEN;
use artnode_core::{
    ActivityIndicators, ArtNetNode, Dispatch, FrameBuffer, NodeConfig, NodeStats, OutputDriver,
    PixelSink, RenderClock,
};
use serde::Serialize;
use tracing::{debug, info, warn};

const ACTIVITY_TICK: Duration = Duration::from_millis(500);
const MAX_READ_WAIT: Duration = Duration::from_millis(100);
/// Back-to-back receive failures tolerated before the socket is considered dead.
const MAX_CONSECUTIVE_RECV_ERRORS: u32 = 64;

pub struct ListenOptions {
    pub bind: SocketAddr,
    pub stats_interval: Duration,
    pub duration: Option<Duration>,
}

pub fn run<D: OutputDriver>(
    config: &NodeConfig,
    options: &ListenOptions,
    mut driver: D,
) -> Result<NodeStats> {
    let identity = config.identity().context("invalid node configuration")?;
    let map = config.universe_map().context("invalid node configuration")?;

    let socket = UdpSocket::bind(options.bind)
        .with_context(|| format!("Failed to bind UDP socket on {}", options.bind))?;
    let local = socket.local_addr().context("Failed to read local address")?;
    if let IpAddr::V4(ip) = local.ip() {
        if !ip.is_unspecified() {
            identity.local_ip().set(ip);
        }
    }
    info!(
        %local,
        advertised_ip = %identity.ip(),
        outputs = map.number_of_outputs(),
        start_universe = map.start_universe(),
        "listening for Art-Net"
    );

    let mut node = ArtNetNode::new(identity, PixelSink::new(map));
    let mut clock = RenderClock::new(config.render.update_hz);

    let running = Arc::new(AtomicBool::new(true));
    let ticker = spawn_activity_ticker(node.activity(), Arc::clone(&running));

    let started = Instant::now();
    let mut last_stats = started;
    let mut buf = vec![0u8; MAX_PACKET_LEN + 1];
    let mut recv_errors = 0u32;
    let result = loop {
        let now = Instant::now();
        if options.duration.is_some_and(|limit| now.duration_since(started) >= limit) {
            break Ok(());
        }

        let wait = clock.time_until_next(now).clamp(Duration::from_millis(1), MAX_READ_WAIT);
        if let Err(err) = socket.set_read_timeout(Some(wait)) {
            break Err(err).context("Failed to set socket timeout");
        }
        match socket.recv_from(&mut buf) {
            Ok((len, sender)) => {
                recv_errors = 0;
                if let Dispatch::Reply(replies) = node.handle_packet(&buf[..len], sender) {
                    for reply in replies {
                        // Fire-and-forget: a lost reply is answered by the next poll.
                        if let Err(err) = socket.send_to(&reply.payload, reply.destination) {
                            warn!(destination = %reply.destination, error = %err, "poll reply not sent");
                        }
                    }
                }
            }
            Err(err) if is_idle(&err) => {}
            Err(err) => {
                // ICMP unreachable from a reply, or an oversized datagram.
                recv_errors += 1;
                warn!(error = %err, consecutive = recv_errors, "datagram receive failed");
                if recv_errors >= MAX_CONSECUTIVE_RECV_ERRORS {
                    break Err(err).context("UDP receive keeps failing");
                }
            }
        }

        let now = Instant::now();
        if let Err(err) = clock.tick(now, node.sink_mut(), &mut driver) {
            break Err(err).context("output driver failed");
        }
        if now.duration_since(last_stats) >= options.stats_interval {
            last_stats = now;
            log_stats(node.stats());
        }
    };

    running.store(false, Ordering::Relaxed);
    if ticker.join().is_err() {
        warn!("activity ticker thread panicked");
    }
    result.map(|()| node.stats().clone())
}

/// Read timeout with nothing received.
fn is_idle(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

fn log_stats(stats: &NodeStats) {
    info!(
        packets = stats.packets_total,
        dmx_frames = stats.dmx_frames,
        out_of_range = stats.frames_out_of_range,
        polls = stats.polls,
        syncs = stats.syncs,
        malformed = stats.malformed,
        unsupported = stats.unsupported_opcode,
        "node stats"
    );
}

fn spawn_activity_ticker(
    activity: ActivityIndicators,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            thread::sleep(ACTIVITY_TICK);
            let sample = activity.take();
            if sample.dmx || sample.poll {
                debug!(dmx = sample.dmx, poll = sample.poll, "activity");
            }
        }
    })
}

/// Writes every rendered frame to a JSON file, replacing the previous one.
pub struct SnapshotDriver {
    path: PathBuf,
    frame: u64,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    frame: u64,
    pixels_per_strip: usize,
    strips: &'a [String],
}

impl SnapshotDriver {
    pub fn new(path: PathBuf) -> Self {
        Self { path, frame: 0 }
    }
}

impl OutputDriver for SnapshotDriver {
    type Error = io::Error;

    fn show(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error> {
        self.frame += 1;
        let strips: Vec<String> = (0..frame.strip_count())
            .filter_map(|strip| frame.strip_hex(strip))
            .collect();
        let doc = Snapshot {
            frame: self.frame,
            pixels_per_strip: frame.pixels_per_strip(),
            strips: &strips,
        };
        let json = serde_json::to_vec(&doc).map_err(io::Error::from)?;
        std::fs::write(&self.path, json)
    }
}
