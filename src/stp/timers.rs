//! The one-second tick: link polling and every timer expiry.

use tracing::debug;

use crate::link::PortLink;
use crate::tick::Tickable;

use super::{Bridge, Port, PortNo, PortState};

impl<L: PortLink> Tickable for Bridge<L> {
    fn tick(&mut self) {
        if !self.running {
            return;
        }

        let nos: Vec<PortNo> = self.ports.keys().copied().collect();
        for &no in &nos {
            self.update_port_status(no);
        }

        if self.hello_timer.expired(self.hello_time) {
            self.hello_timer_expiry();
        }
        if self.tcn_timer.expired(self.config.hello_time_value()) {
            self.tcn_timer_expiry();
        }
        if self.topology_change_timer.expired(self.topology_change_time) {
            self.topology_change_timer_expiry();
        }

        for &no in &nos {
            let max_age = self.max_age;
            if self.port_timer_expired(no, |p| p.message_age_timer.expired(max_age)) {
                self.message_age_timer_expiry(no);
            }
        }

        for &no in &nos {
            let forward_delay = self.forward_delay;
            if self.port_timer_expired(no, |p| p.forward_delay_timer.expired(forward_delay)) {
                self.forward_delay_timer_expiry(no);
            }

            let hold_time = self.config.hold_time_value();
            if self.port_timer_expired(no, |p| p.hold_timer.expired(hold_time)) {
                self.hold_timer_expiry(no);
            }
        }
    }
}

impl<L: PortLink> Bridge<L> {
    fn port_timer_expired(&mut self, no: PortNo, poll: impl FnOnce(&mut Port) -> bool) -> bool {
        self.ports.get_mut(&no).is_some_and(poll)
    }

    /// Follows the link and administrative status of the interface.
    fn update_port_status(&mut self, no: PortNo) {
        let up = self.port_is_up(no);
        let disabled = self.ports.get(&no).map(|p| p.state) == Some(PortState::Disabled);

        if up && disabled {
            debug!(port = %no, "link up");
            self.enable_port(no);
        } else if !up && !disabled {
            debug!(port = %no, "link down");
            self.disable_port(no);
        }
    }

    fn hello_timer_expiry(&mut self) {
        self.config_bpdu_generation();
        self.hello_timer.start(0);
    }

    fn tcn_timer_expiry(&mut self) {
        self.transmit_tcn();
        self.tcn_timer.start(0);
    }

    fn topology_change_timer_expiry(&mut self) {
        debug!(bridge = %self.bridge_id, "topology change period over");
        self.topology_change_detected = false;
        self.topology_change = false;
    }

    /// The information recorded on port `no` aged out: the port claims its segment, and if that
    /// leaves this bridge as root it starts acting as one.
    fn message_age_timer_expiry(&mut self, no: PortNo) {
        debug!(port = %no, "recorded information aged out");
        let was_root = self.is_root_bridge();

        self.become_designated_port(no);
        self.configuration_update();
        self.port_state_selection();

        if self.is_root_bridge() && !was_root {
            self.assume_root_role();
        }
    }

    fn forward_delay_timer_expiry(&mut self, no: PortNo) {
        let state = match self.ports.get(&no) {
            Some(port) => port.state,
            None => return,
        };

        match state {
            PortState::Listening => {
                self.set_port_state(no, PortState::Learning);
                if let Some(port) = self.ports.get_mut(&no) {
                    port.forward_delay_timer.start(0);
                }
            }
            PortState::Learning => {
                self.set_port_state(no, PortState::Forwarding);
                let change_detection = self
                    .ports
                    .get(&no)
                    .is_some_and(|p| p.change_detection_enabled);
                if self.designated_for_some_port() && change_detection {
                    self.topology_change_detection();
                }
            }
            _ => {}
        }
    }

    fn hold_timer_expiry(&mut self, no: PortNo) {
        if self.ports.get(&no).is_some_and(|p| p.config_pending) {
            self.transmit_config(no);
        }
    }
}
