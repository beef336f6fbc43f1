//! Root bridge, root port and designated port selection.

use tracing::debug;

use crate::link::PortLink;

use super::{Bridge, BridgeId, ConfigBpdu, Port, PortNo, PortState};

/// True when `cu` should replace the information recorded on `port`.
///
/// Ordering is root id, then root path cost, then transmitting bridge id. On a full tie the
/// advertisement wins unless it was sent by `own_bridge` itself, in which case only the same or a
/// lower port id wins. A repeated advertisement from another bridge therefore supersedes, which is
/// what refreshes the message age of recorded information.
pub fn supersedes_port_info(own_bridge: BridgeId, port: &Port, cu: &ConfigBpdu) -> bool {
    let candidate = (cu.root_id, cu.root_path_cost, cu.bridge_id);
    let recorded = (
        port.designated_root,
        port.designated_cost,
        port.designated_bridge,
    );

    if candidate != recorded {
        return candidate < recorded;
    }

    cu.bridge_id != own_bridge || cu.port_id <= port.designated_port
}

fn is_designated(bridge_id: BridgeId, port: &Port) -> bool {
    port.designated_bridge == bridge_id && port.designated_port == port.port_id
}

impl<L: PortLink> Bridge<L> {
    pub fn is_root_bridge(&self) -> bool {
        self.designated_root == self.bridge_id
    }

    /// True when port `no` is the designated port for its segment.
    pub fn is_designated_port(&self, no: PortNo) -> bool {
        self.ports
            .get(&no)
            .is_some_and(|p| is_designated(self.bridge_id, p))
    }

    /// True when this bridge is the designated bridge on at least one segment.
    pub(crate) fn designated_for_some_port(&self) -> bool {
        self.ports
            .values()
            .any(|p| p.designated_bridge == self.bridge_id)
    }

    /// Whether a received configuration would replace what port `no` has recorded.
    pub fn supersedes(&self, no: PortNo, cu: &ConfigBpdu) -> bool {
        self.ports
            .get(&no)
            .is_some_and(|p| supersedes_port_info(self.bridge_id, p, cu))
    }

    pub(crate) fn record_config_information(&mut self, no: PortNo, cu: &ConfigBpdu) {
        if let Some(port) = self.ports.get_mut(&no) {
            port.designated_root = cu.root_id;
            port.designated_cost = cu.root_path_cost;
            port.designated_bridge = cu.bridge_id;
            port.designated_port = cu.port_id;
            port.message_age_timer.start(cu.message_age);
        }
    }

    pub(crate) fn record_config_timeout_values(&mut self, cu: &ConfigBpdu) {
        self.max_age = cu.max_age;
        self.hello_time = cu.hello_time;
        self.forward_delay = cu.forward_delay;
        self.topology_change = cu.topology_change;
    }

    pub(crate) fn configuration_update(&mut self) {
        self.root_selection();
        self.designated_port_selection();
    }

    /// Picks the port with the best recorded path to a root better than this bridge, or makes this
    /// bridge root when there is none.
    pub(crate) fn root_selection(&mut self) {
        let bridge_id = self.bridge_id;
        let best = self
            .ports
            .values()
            .filter(|p| !is_designated(bridge_id, p))
            .filter(|p| p.state != PortState::Disabled)
            .filter(|p| p.designated_root < bridge_id)
            .min_by_key(|p| {
                (
                    p.designated_root,
                    p.designated_cost.saturating_add(p.path_cost),
                    p.designated_bridge,
                    p.designated_port,
                    p.port_id,
                )
            })
            .map(|p| (p.no, p.designated_root, p.designated_cost.saturating_add(p.path_cost)));

        let previous = self.root_port;
        match best {
            Some((no, root, cost)) => {
                self.root_port = Some(no);
                self.designated_root = root;
                self.root_path_cost = cost;
            }
            None => {
                self.root_port = None;
                self.designated_root = bridge_id;
                self.root_path_cost = 0;
            }
        }

        if previous != self.root_port {
            debug!(
                bridge = %bridge_id,
                root = %self.designated_root,
                cost = self.root_path_cost,
                root_port = ?self.root_port.map(|no| no.0),
                "root port changed"
            );
        }
    }

    /// Claims every segment where this bridge offers the better path to the root.
    pub(crate) fn designated_port_selection(&mut self) {
        let bridge_id = self.bridge_id;
        let designated_root = self.designated_root;
        let root_path_cost = self.root_path_cost;

        let claimed: Vec<PortNo> = self
            .ports
            .values()
            .filter(|p| {
                is_designated(bridge_id, p)
                    || p.designated_root != designated_root
                    || (root_path_cost, bridge_id, p.port_id)
                        <= (p.designated_cost, p.designated_bridge, p.designated_port)
            })
            .map(|p| p.no)
            .collect();

        for no in claimed {
            self.become_designated_port(no);
        }
    }

    pub(crate) fn become_designated_port(&mut self, no: PortNo) {
        let (root, cost, bridge) = (self.designated_root, self.root_path_cost, self.bridge_id);
        if let Some(port) = self.ports.get_mut(&no) {
            port.designated_root = root;
            port.designated_cost = cost;
            port.designated_bridge = bridge;
            port.designated_port = port.port_id;
        }
    }
}
