//! Topology change detection, notification toward the root, and acknowledgement.

use tracing::debug;

use crate::link::PortLink;

use super::{Bridge, PortNo};

impl<L: PortLink> Bridge<L> {
    /// The root starts the network-wide topology change period; any other bridge notifies its
    /// upstream neighbour once and keeps retrying on the TCN timer until acknowledged.
    pub(crate) fn topology_change_detection(&mut self) {
        if self.is_root_bridge() {
            self.topology_change = true;
            self.topology_change_timer.start(0);
            debug!(bridge = %self.bridge_id, "topology change period started");
        } else if !self.topology_change_detected {
            self.transmit_tcn();
            self.tcn_timer.start(0);
        }
        self.topology_change_detected = true;
    }

    /// The root port heard the acknowledgement flag.
    pub(crate) fn topology_change_acknowledged(&mut self) {
        debug!(bridge = %self.bridge_id, "topology change acknowledged");
        self.topology_change_detected = false;
        self.tcn_timer.stop();
    }

    /// Answers a TCN received on designated port `no`.
    pub(crate) fn acknowledge_topology_change(&mut self, no: PortNo) {
        if let Some(port) = self.ports.get_mut(&no) {
            port.topology_change_acknowledge = true;
        }
        self.transmit_config(no);
    }
}
