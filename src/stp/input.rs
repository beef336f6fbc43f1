use tracing::{debug, trace};

use crate::ethernet::{ByteSerializable, Ethernet802_3Frame, MacAddress, STP_GROUP_ADDRESS};
use crate::is_mac_multicast_or_broadcast;
use crate::link::PortLink;

use super::{Bpdu, Bridge, ConfigBpdu, PortNo, PortState};

/// What the host should do with a frame after the bridge has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDisposition {
    /// Spanning tree traffic; never forwarded.
    Consumed,
    /// Not for the spanning tree entity; continue normal processing.
    PassThrough,
}

impl<L: PortLink> Bridge<L> {
    /// Classifies a frame received on port `no` by destination address and hands BPDUs to the
    /// protocol. `payload` starts at the LLC header.
    ///
    /// Malformed BPDUs are dropped without touching any state. A stopped bridge still consumes
    /// BPDUs on its enrolled ports but does not act on them.
    pub fn input(
        &mut self,
        no: PortNo,
        destination: &MacAddress,
        payload: &[u8],
    ) -> FrameDisposition {
        if *destination != STP_GROUP_ADDRESS || !self.ports.contains_key(&no) {
            return FrameDisposition::PassThrough;
        }

        match Bpdu::from_bytes(payload) {
            Ok(bpdu) => self.receive_bpdu(no, bpdu),
            Err(err) => trace!(port = %no, error = %err, "dropping malformed BPDU"),
        }
        FrameDisposition::Consumed
    }

    /// Like [`Bridge::input`] for a whole 802.3 frame.
    pub fn input_frame(&mut self, no: PortNo, frame: &[u8]) -> FrameDisposition {
        let frame = match Ethernet802_3Frame::from_bytes(frame) {
            Ok(frame) => frame,
            Err(_) => return FrameDisposition::PassThrough,
        };

        // A source address cannot be a multicast or broadcast address
        if is_mac_multicast_or_broadcast!(frame.source_address) {
            return FrameDisposition::PassThrough;
        }

        self.input(no, &frame.destination_address, &frame.payload)
    }

    /// Processes a decoded BPDU received on port `no`.
    pub fn receive_bpdu(&mut self, no: PortNo, bpdu: Bpdu) {
        if !self.running {
            return;
        }

        match bpdu {
            Bpdu::Config(cu) => self.received_config_bpdu(no, &cu),
            Bpdu::Tcn => self.received_tcn_bpdu(no),
        }
    }

    fn received_config_bpdu(&mut self, no: PortNo, cu: &ConfigBpdu) {
        match self.ports.get(&no) {
            Some(port) if port.state != PortState::Disabled => {}
            _ => return,
        }

        if !self.supersedes(no, cu) {
            // Stale information from a bridge that should be listening to us
            if self.is_designated_port(no) {
                self.transmit_config(no);
            }
            return;
        }

        let was_root = self.is_root_bridge();
        self.record_config_information(no, cu);
        self.configuration_update();
        self.port_state_selection();

        if was_root && !self.is_root_bridge() {
            debug!(bridge = %self.bridge_id, root = %self.designated_root, "no longer root bridge");
            self.hello_timer.stop();
            if self.topology_change_detected {
                self.topology_change_timer.stop();
                self.transmit_tcn();
                self.tcn_timer.start(0);
            }
        }

        if Some(no) == self.root_port {
            self.record_config_timeout_values(cu);
            self.config_bpdu_generation();
            if cu.topology_change_ack {
                self.topology_change_acknowledged();
            }
        }
    }

    fn received_tcn_bpdu(&mut self, no: PortNo) {
        match self.ports.get(&no) {
            Some(port) if port.state != PortState::Disabled => {}
            _ => return,
        }

        if self.is_designated_port(no) {
            debug!(port = %no, "topology change notification received");
            self.topology_change_detection();
            self.acknowledge_topology_change(no);
        }
    }
}
