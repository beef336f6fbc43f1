//! Per-port state machine: Disabled, Blocking, Listening, Learning, Forwarding.

use tracing::debug;

use crate::link::PortLink;

use super::{Bridge, PortNo, PortState};

impl<L: PortLink> Bridge<L> {
    /// Moves the root port and designated ports toward Forwarding and every other port to Blocking.
    pub(crate) fn port_state_selection(&mut self) {
        let nos: Vec<PortNo> = self.ports.keys().copied().collect();
        for no in nos {
            if Some(no) == self.root_port {
                self.clear_port_flags(no);
                self.make_forwarding(no);
            } else if self.is_designated_port(no) {
                if let Some(port) = self.ports.get_mut(&no) {
                    port.message_age_timer.stop();
                }
                self.make_forwarding(no);
            } else {
                self.clear_port_flags(no);
                self.make_blocking(no);
            }
        }
    }

    fn clear_port_flags(&mut self, no: PortNo) {
        if let Some(port) = self.ports.get_mut(&no) {
            port.config_pending = false;
            port.topology_change_acknowledge = false;
        }
    }

    fn make_forwarding(&mut self, no: PortNo) {
        if self.port_state(no) != Some(PortState::Blocking) {
            return;
        }

        self.set_port_state(no, PortState::Listening);
        if let Some(port) = self.ports.get_mut(&no) {
            port.forward_delay_timer.start(0);
        }
    }

    fn make_blocking(&mut self, no: PortNo) {
        let (state, change_detection) = match self.ports.get(&no) {
            Some(port) => (port.state, port.change_detection_enabled),
            None => return,
        };
        if state == PortState::Disabled || state == PortState::Blocking {
            return;
        }

        if state == PortState::Forwarding && change_detection {
            self.topology_change_detection();
        }
        self.set_port_state(no, PortState::Blocking);
        if let Some(port) = self.ports.get_mut(&no) {
            port.forward_delay_timer.stop();
        }
    }

    /// Records the new state; learned addresses are flushed whenever a port stops learning or is
    /// disabled.
    pub(crate) fn set_port_state(&mut self, no: PortNo, state: PortState) {
        let previous = match self.ports.get_mut(&no) {
            Some(port) if port.state != state => std::mem::replace(&mut port.state, state),
            _ => return,
        };

        debug!(port = %no, from = ?previous, to = ?state, "port state change");
        if (previous.is_learning() && !state.is_learning()) || state == PortState::Disabled {
            self.link.flush_learned_addresses(no);
        }
    }

    fn port_state(&self, no: PortNo) -> Option<PortState> {
        self.ports.get(&no).map(|p| p.state)
    }

    /// Resets a port to Blocking with this bridge's own information, as when it is first enabled.
    pub(crate) fn initialize_port(&mut self, no: PortNo) {
        self.become_designated_port(no);
        self.set_port_state(no, PortState::Blocking);
        if let Some(port) = self.ports.get_mut(&no) {
            port.topology_change_acknowledge = false;
            port.config_pending = false;
            port.stop_timers();
        }
    }

    pub(crate) fn enable_port(&mut self, no: PortNo) {
        self.initialize_port(no);
        self.port_state_selection();
    }

    /// Takes a port out of the protocol. If the port carried the path to the root and this bridge
    /// now finds itself root, it starts acting as root straight away.
    pub(crate) fn disable_port(&mut self, no: PortNo) {
        let was_root = self.is_root_bridge();

        self.become_designated_port(no);
        self.set_port_state(no, PortState::Disabled);
        if let Some(port) = self.ports.get_mut(&no) {
            port.topology_change_acknowledge = false;
            port.config_pending = false;
            port.stop_timers();
        }

        self.configuration_update();
        self.port_state_selection();

        if self.is_root_bridge() && !was_root {
            self.assume_root_role();
        }
    }

    /// Called when this bridge has just become root: its own timer values apply, the change is
    /// announced, and hello transmission starts.
    pub(crate) fn assume_root_role(&mut self) {
        tracing::info!(bridge = %self.bridge_id, "became root bridge");

        self.adopt_own_timer_values();
        self.topology_change_detection();
        self.tcn_timer.stop();
        self.config_bpdu_generation();
        self.hello_timer.start(0);
    }
}
