use tracing::{debug, trace};

use crate::ethernet::ByteSerializable;
use crate::link::PortLink;

use super::{Bpdu, Bridge, ConfigBpdu, PortNo, PortState, MESSAGE_AGE_INCREMENT};

impl<L: PortLink> Bridge<L> {
    /// Sends this bridge's configuration on port `no`, at most once per hold time.
    ///
    /// While the hold timer runs the transmission is only marked pending; the hold timer expiry
    /// sends it. Information whose message age has reached max age is not relayed at all.
    pub(crate) fn transmit_config(&mut self, no: PortNo) {
        let message_age = if self.is_root_bridge() {
            0
        } else {
            let root_age = self
                .root_port
                .and_then(|root| self.ports.get(&root))
                .map_or(0, |p| p.message_age_timer.value());
            root_age.saturating_add(MESSAGE_AGE_INCREMENT)
        };

        let (root_id, root_path_cost, bridge_id) =
            (self.designated_root, self.root_path_cost, self.bridge_id);
        let (max_age, hello_time, forward_delay) =
            (self.max_age, self.hello_time, self.forward_delay);
        let topology_change = self.topology_change;

        let port = match self.ports.get_mut(&no) {
            Some(port) => port,
            None => return,
        };

        if port.hold_timer.is_active() {
            port.config_pending = true;
            trace!(port = %no, "configuration deferred by hold timer");
            return;
        }

        if message_age >= max_age {
            trace!(port = %no, message_age, "configuration too old to relay");
            return;
        }

        let cu = ConfigBpdu {
            root_id,
            root_path_cost,
            bridge_id,
            port_id: port.port_id,
            message_age,
            max_age,
            hello_time,
            forward_delay,
            topology_change,
            topology_change_ack: port.topology_change_acknowledge,
        };

        port.topology_change_acknowledge = false;
        port.config_pending = false;
        port.hold_timer.start(0);

        self.link.send_frame(no, Bpdu::Config(cu).to_bytes());
    }

    /// Sends configuration on every designated port that is not disabled.
    pub(crate) fn config_bpdu_generation(&mut self) {
        let nos: Vec<PortNo> = self
            .ports
            .values()
            .filter(|p| p.state != PortState::Disabled)
            .map(|p| p.no)
            .collect();

        for no in nos {
            if self.is_designated_port(no) {
                self.transmit_config(no);
            }
        }
    }

    /// Notifies the upstream bridge on the root port. Does nothing while this bridge is root.
    pub(crate) fn transmit_tcn(&mut self) {
        if let Some(root_port) = self.root_port {
            debug!(port = %root_port, "sending topology change notification");
            self.link.send_frame(root_port, Bpdu::Tcn.to_bytes());
        }
    }
}
