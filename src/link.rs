use std::collections::HashMap;

use bytes::Bytes;

use crate::stp::PortNo;

/// Physical and administrative status of the interface behind a port, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Up,
    Down,
    /// Driver cannot tell; treated as up.
    Unknown,
}

impl LinkStatus {
    pub fn is_up(&self) -> bool {
        *self != LinkStatus::Down
    }
}

/// The data path the spanning tree engine drives but does not own.
pub trait PortLink {
    /// Queues an LLC-wrapped BPDU for transmission to the bridge group address on `port`.
    /// Fire and forget; queuing failures belong to the transmit path.
    fn send_frame(&mut self, port: PortNo, payload: Bytes);

    /// Purges learned forwarding entries that point at `port`.
    fn flush_learned_addresses(&mut self, port: PortNo);

    /// Polled once per tick to enable or disable ports automatically.
    fn link_status(&self, port: PortNo) -> LinkStatus;
}

/// A [`PortLink`] that queues outgoing BPDUs and records flushes until the host drains them.
///
/// Ports report [`LinkStatus::Unknown`] until a status is set.
#[derive(Debug, Default)]
pub struct FrameQueue {
    outgoing: Vec<(PortNo, Bytes)>,
    flushed: Vec<PortNo>,
    status: HashMap<PortNo, LinkStatus>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames queued since the last drain, in transmission order.
    pub fn outgoing(&self) -> &[(PortNo, Bytes)] {
        &self.outgoing
    }

    pub fn drain_outgoing(&mut self) -> Vec<(PortNo, Bytes)> {
        std::mem::take(&mut self.outgoing)
    }

    /// Ports flushed since the last drain, one entry per flush.
    pub fn flushed(&self) -> &[PortNo] {
        &self.flushed
    }

    pub fn drain_flushed(&mut self) -> Vec<PortNo> {
        std::mem::take(&mut self.flushed)
    }

    pub fn set_link_status(&mut self, port: PortNo, status: LinkStatus) {
        self.status.insert(port, status);
    }
}

impl PortLink for FrameQueue {
    fn send_frame(&mut self, port: PortNo, payload: Bytes) {
        self.outgoing.push((port, payload));
    }

    fn flush_learned_addresses(&mut self, port: PortNo) {
        self.flushed.push(port);
    }

    fn link_status(&self, port: PortNo) -> LinkStatus {
        self.status
            .get(&port)
            .copied()
            .unwrap_or(LinkStatus::Unknown)
    }
}
