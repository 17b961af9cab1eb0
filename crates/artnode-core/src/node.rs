//! Node identity advertised in poll replies, plus the small pieces of state
//! shared with the outside world (local address, activity indicators).

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::routing::UniverseMap;

/// Local IPv4 address shared with the network layer.
///
/// Clones share the same cell. Writers may update it from any thread; readers
/// see the latest stored value with no ordering guarantee relative to packet
/// handling.
#[derive(Debug, Clone)]
pub struct LocalIp {
    cell: Arc<AtomicU32>,
}

impl LocalIp {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            cell: Arc::new(AtomicU32::new(u32::from(ip))),
        }
    }

    pub fn get(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.cell.load(Ordering::Relaxed))
    }

    pub fn set(&self, ip: Ipv4Addr) {
        self.cell.store(u32::from(ip), Ordering::Relaxed);
    }
}

/// Description of this node as reported to controllers.
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
///
/// use artnode_core::{NodeIdentity, UniverseMap};
///
/// let map = UniverseMap::new(0, 2, 5, 340).unwrap();
/// let identity = NodeIdentity::new("Light Node", "Art-Net Light Node",
///     Ipv4Addr::new(10, 0, 0, 7), [0; 6], &map);
/// assert_eq!(identity.port_universes(), &[0, 2, 4, 6, 8]);
///
/// identity.local_ip().set(Ipv4Addr::new(10, 0, 0, 8));
/// assert_eq!(identity.ip(), Ipv4Addr::new(10, 0, 0, 8));
/// ```
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    short_name: String,
    long_name: String,
    ip: LocalIp,
    mac: [u8; 6],
    port_universes: Vec<u16>,
    universe_count: u32,
}

impl NodeIdentity {
    pub fn new(
        short_name: impl Into<String>,
        long_name: impl Into<String>,
        ip: Ipv4Addr,
        mac: [u8; 6],
        map: &UniverseMap,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: long_name.into(),
            ip: LocalIp::new(ip),
            mac,
            port_universes: map.output_universes(),
            universe_count: map.universe_count(),
        }
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip.get()
    }

    /// Handle for the network layer to publish address changes.
    pub fn local_ip(&self) -> LocalIp {
        self.ip.clone()
    }

    pub fn mac(&self) -> [u8; 6] {
        self.mac
    }

    /// First universe consumed by each physical output, in output order.
    pub fn port_universes(&self) -> &[u16] {
        &self.port_universes
    }

    /// Total universes consumed across all outputs.
    pub fn universe_count(&self) -> u32 {
        self.universe_count
    }
}

/// Activity flags raised by the packet loop and drained by a periodic ticker.
///
/// This is the only state the ticker is allowed to touch.
#[derive(Debug, Clone, Default)]
pub struct ActivityIndicators {
    dmx: Arc<AtomicBool>,
    poll: Arc<AtomicBool>,
}

/// Snapshot taken by [`ActivityIndicators::take`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivitySample {
    pub dmx: bool,
    pub poll: bool,
}

impl ActivityIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dmx(&self) {
        self.dmx.store(true, Ordering::Relaxed);
    }

    pub fn mark_poll(&self) {
        self.poll.store(true, Ordering::Relaxed);
    }

    /// Read and clear both flags.
    pub fn take(&self) -> ActivitySample {
        ActivitySample {
            dmx: self.dmx.swap(false, Ordering::Relaxed),
            poll: self.poll.swap(false, Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::thread;

    use super::{ActivityIndicators, ActivitySample, LocalIp, NodeIdentity};
    use crate::routing::UniverseMap;

    #[test]
    fn local_ip_updates_are_visible_through_clones() {
        let ip = LocalIp::new(Ipv4Addr::new(192, 168, 1, 116));
        let writer = ip.clone();
        thread::spawn(move || writer.set(Ipv4Addr::new(10, 1, 2, 3)))
            .join()
            .unwrap();
        assert_eq!(ip.get(), Ipv4Addr::new(10, 1, 2, 3));
    }

    #[test]
    fn identity_reports_port_universes() {
        let map = UniverseMap::new(16, 3, 3, 510).unwrap();
        let identity = NodeIdentity::new("s", "l", Ipv4Addr::LOCALHOST, [1; 6], &map);
        assert_eq!(identity.port_universes(), &[16, 19, 22]);
        assert_eq!(identity.universe_count(), 9);
        assert_eq!(identity.mac(), [1; 6]);
    }

    #[test]
    fn activity_take_clears_flags() {
        let activity = ActivityIndicators::new();
        let ticker = activity.clone();
        activity.mark_dmx();

        assert_eq!(
            ticker.take(),
            ActivitySample {
                dmx: true,
                poll: false
            }
        );
        assert_eq!(ticker.take(), ActivitySample::default());

        activity.mark_poll();
        assert!(ticker.take().poll);
    }
}
