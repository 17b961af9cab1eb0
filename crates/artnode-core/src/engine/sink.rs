use std::net::SocketAddr;

use tracing::trace;

use crate::protocols::artnet::DmxFrame;
use crate::routing::{FrameBuffer, RoutingOutcome, UniverseMap, UniverseRouter};

/// Consumer of decoded ArtDmx and ArtSync packets.
///
/// Calls happen synchronously from [`crate::ArtNetNode::handle_packet`], in
/// datagram order; a frame is fully applied before the next datagram is
/// looked at.
pub trait FrameSink {
    fn on_dmx(&mut self, frame: &DmxFrame<'_>, sender: SocketAddr) -> RoutingOutcome;

    fn on_sync(&mut self, sender: SocketAddr);
}

/// Routes frames into pixel strips and remembers pending sync requests.
#[derive(Debug)]
pub struct PixelSink {
    router: UniverseRouter,
    sync_pending: bool,
    last_sync_source: Option<SocketAddr>,
}

impl PixelSink {
    pub fn new(map: UniverseMap) -> Self {
        Self {
            router: UniverseRouter::new(map),
            sync_pending: false,
            last_sync_source: None,
        }
    }

    pub fn router(&self) -> &UniverseRouter {
        &self.router
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        self.router.frame_buffer()
    }

    /// Returns whether an ArtSync arrived since the last call, and clears it.
    pub fn take_sync(&mut self) -> bool {
        std::mem::take(&mut self.sync_pending)
    }

    pub fn last_sync_source(&self) -> Option<SocketAddr> {
        self.last_sync_source
    }
}

impl FrameSink for PixelSink {
    fn on_dmx(&mut self, frame: &DmxFrame<'_>, _sender: SocketAddr) -> RoutingOutcome {
        self.router.route(frame)
    }

    fn on_sync(&mut self, sender: SocketAddr) {
        trace!(%sender, "ArtSync");
        self.sync_pending = true;
        self.last_sync_source = Some(sender);
    }
}
