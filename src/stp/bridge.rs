use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{
    check_path_cost, check_range, BridgeConfig, PortConfig, FORWARD_DELAY_RANGE,
    HELLO_TIME_RANGE, MAX_AGE_RANGE,
};
use crate::error::{Result, StpError};
use crate::ethernet::MacAddress;
use crate::link::PortLink;
use crate::tick::StpTimer;

use super::{port_id, BridgeId, Port, PortNo, PortState, TimeValue};

/// A bridge running the 802.1D spanning tree protocol over its enrolled ports.
///
/// The bridge owns its ports (keyed by port number) and every protocol timer. The host supplies a
/// [`PortLink`] for transmission, address-table flushes and link status.
pub struct Bridge<L: PortLink> {
    pub(crate) link: L,
    pub(crate) config: BridgeConfig,
    pub(crate) ports: BTreeMap<PortNo, Port>,
    pub(crate) running: bool,

    pub(crate) bridge_id: BridgeId,
    pub(crate) designated_root: BridgeId, // Equals bridge_id iff this bridge is root
    pub(crate) root_path_cost: u32,
    pub(crate) root_port: Option<PortNo>, // None iff this bridge is root

    // Values in use; learned from the root while not root
    pub(crate) max_age: TimeValue,
    pub(crate) hello_time: TimeValue,
    pub(crate) forward_delay: TimeValue,

    pub(crate) topology_change_time: TimeValue,
    pub(crate) topology_change: bool,
    pub(crate) topology_change_detected: bool,

    pub(crate) hello_timer: StpTimer,
    pub(crate) tcn_timer: StpTimer,
    pub(crate) topology_change_timer: StpTimer,
}

/// Point-in-time view of a bridge and its ports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeStatus {
    pub running: bool,
    pub bridge_id: BridgeId,
    pub designated_root: BridgeId,
    pub root_path_cost: u32,
    pub root_port: Option<PortNo>,
    pub max_age: TimeValue,
    pub hello_time: TimeValue,
    pub forward_delay: TimeValue,
    pub topology_change: bool,
    pub topology_change_detected: bool,
    pub hello_timer: StpTimer,
    pub tcn_timer: StpTimer,
    pub topology_change_timer: StpTimer,
    pub ports: Vec<Port>,
}

impl<L: PortLink> Bridge<L> {
    /// Creates a stopped bridge with no ports.
    pub fn new(config: BridgeConfig, link: L) -> Result<Bridge<L>> {
        config.validate()?;

        Ok(Bridge {
            link,
            config,
            ports: BTreeMap::new(),
            running: false,
            bridge_id: BridgeId::default(),
            designated_root: BridgeId::default(),
            root_path_cost: 0,
            root_port: None,
            max_age: config.max_age_value(),
            hello_time: config.hello_time_value(),
            forward_delay: config.forward_delay_value(),
            topology_change_time: config.max_age_value() + config.forward_delay_value(),
            topology_change: false,
            topology_change_detected: false,
            hello_timer: StpTimer::new(),
            tcn_timer: StpTimer::new(),
            topology_change_timer: StpTimer::new(),
        })
    }

    /// Enrolls an interface as port `no`.
    ///
    /// On a running bridge the port starts Blocking and competes immediately; if its address
    /// becomes the lowest of the bridge the whole bridge re-initializes with the new identifier.
    pub fn add_port(&mut self, no: PortNo, address: MacAddress, config: PortConfig) -> Result<()> {
        if no.0 == 0 {
            return Err(StpError::invalid("port", "port number 0 is reserved"));
        }
        config.validate()?;

        if self.ports.contains_key(&no) {
            return Err(StpError::PortExists(no));
        }
        if self.ports.len() >= self.config.max_ports {
            return Err(StpError::PortCapacity {
                max: self.config.max_ports,
            });
        }

        self.ports.insert(no, Port::new(no, address, &config));
        debug!(port = %no, "port enrolled");

        if !self.running {
            return Ok(());
        }

        if self.lowest_port_address() != Some(self.bridge_id.address()) {
            self.init();
            return Ok(());
        }

        self.reset_port(no);
        if self.port_is_up(no) {
            self.enable_port(no);
        } else {
            self.port_state_selection();
        }
        Ok(())
    }

    /// Withdraws port `no` from the bridge, disabling it first so a lost root port is replaced.
    pub fn remove_port(&mut self, no: PortNo) -> Result<Port> {
        if !self.ports.contains_key(&no) {
            return Err(StpError::PortNotFound(no));
        }

        if self.running {
            self.disable_port(no);
        }

        let port = self.ports.remove(&no).ok_or(StpError::PortNotFound(no))?;
        debug!(port = %no, "port withdrawn");

        if self.running && self.lowest_port_address() != Some(self.bridge_id.address()) {
            self.init();
        }
        Ok(port)
    }

    fn lowest_port_address(&self) -> Option<MacAddress> {
        self.ports.values().map(|p| p.address).min()
    }

    /// (Re)initializes the protocol: this bridge claims root, every port that is up starts
    /// Blocking, and a first round of configuration BPDUs goes out.
    ///
    /// The bridge address is the lowest hardware address among the ports; a bridge without ports
    /// is stopped instead.
    pub fn init(&mut self) {
        let address = match self.lowest_port_address() {
            Some(address) => address,
            None => {
                self.stop();
                return;
            }
        };

        self.bridge_id = BridgeId::new(self.config.priority, address);
        self.designated_root = self.bridge_id;
        self.root_path_cost = 0;
        self.root_port = None;

        self.max_age = self.config.max_age_value();
        self.hello_time = self.config.hello_time_value();
        self.forward_delay = self.config.forward_delay_value();
        self.topology_change_time = self.max_age + self.forward_delay;

        self.topology_change_detected = false;
        self.topology_change = false;
        self.tcn_timer.stop();
        self.topology_change_timer.stop();
        self.running = true;

        let nos: Vec<PortNo> = self.ports.keys().copied().collect();
        for no in nos {
            self.reset_port(no);
            let up = self.port_is_up(no);
            if up {
                self.initialize_port(no);
            }
        }

        self.port_state_selection();
        self.config_bpdu_generation();
        self.hello_timer.start(0);

        info!(bridge = %self.bridge_id, ports = self.ports.len(), "spanning tree initialized");
    }

    /// Stops the protocol: every port goes Disabled and every timer is cleared.
    pub fn stop(&mut self) {
        let nos: Vec<PortNo> = self.ports.keys().copied().collect();
        for no in nos {
            self.set_port_state(no, PortState::Disabled);
            if let Some(port) = self.ports.get_mut(&no) {
                port.stop_timers();
            }
        }

        self.tcn_timer.stop();
        self.topology_change_timer.stop();
        self.hello_timer.stop();

        if self.running {
            info!(bridge = %self.bridge_id, "spanning tree stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Puts a port back to a clean disabled record owned by this bridge.
    fn reset_port(&mut self, no: PortNo) {
        self.set_port_state(no, PortState::Disabled);
        let bridge_id = self.bridge_id;
        let designated_root = self.designated_root;
        let root_path_cost = self.root_path_cost;
        if let Some(port) = self.ports.get_mut(&no) {
            port.stop_timers();
            port.designated_root = designated_root;
            port.designated_cost = root_path_cost;
            port.designated_bridge = bridge_id;
            port.designated_port = port.port_id;
            port.topology_change_acknowledge = false;
            port.config_pending = false;
        }
    }

    pub(crate) fn port_is_up(&self, no: PortNo) -> bool {
        self.ports.get(&no).is_some_and(|p| p.admin_up) && self.link.link_status(no).is_up()
    }

    /// Runs after every administrative change: recompute the tree and advertise the result.
    fn reconfigure(&mut self) {
        if !self.running {
            return;
        }

        self.configuration_update();
        self.port_state_selection();
        self.config_bpdu_generation();
    }
}

// Administrative setters
impl<L: PortLink> Bridge<L> {
    pub fn set_bridge_priority(&mut self, priority: u16) -> Result<()> {
        self.config.priority = priority;
        if !self.running {
            return Ok(());
        }

        let was_root = self.is_root_bridge();
        let new_id = self.bridge_id.with_priority(priority);
        let nos: Vec<PortNo> = self.ports.keys().copied().collect();
        for no in nos {
            if self.is_designated_port(no) {
                if let Some(port) = self.ports.get_mut(&no) {
                    port.designated_bridge = new_id;
                }
            }
        }
        self.bridge_id = new_id;
        debug!(bridge = %new_id, "bridge priority changed");

        self.configuration_update();
        self.port_state_selection();
        if self.is_root_bridge() && !was_root {
            self.assume_root_role();
        } else {
            self.config_bpdu_generation();
        }
        Ok(())
    }

    /// Max age in seconds; advertised only while this bridge is root.
    pub fn set_max_age(&mut self, seconds: u8) -> Result<()> {
        check_range("max_age", seconds, MAX_AGE_RANGE)?;
        self.config.max_age = seconds;
        self.apply_timer_values();
        Ok(())
    }

    /// Hello time in seconds; advertised only while this bridge is root.
    pub fn set_hello_time(&mut self, seconds: u8) -> Result<()> {
        check_range("hello_time", seconds, HELLO_TIME_RANGE)?;
        self.config.hello_time = seconds;
        self.apply_timer_values();
        Ok(())
    }

    /// Forward delay in seconds; advertised only while this bridge is root.
    pub fn set_forward_delay(&mut self, seconds: u8) -> Result<()> {
        check_range("forward_delay", seconds, FORWARD_DELAY_RANGE)?;
        self.config.forward_delay = seconds;
        self.apply_timer_values();
        Ok(())
    }

    fn apply_timer_values(&mut self) {
        self.topology_change_time =
            self.config.max_age_value() + self.config.forward_delay_value();
        if self.running && self.is_root_bridge() {
            self.adopt_own_timer_values();
        }
        self.reconfigure();
    }

    pub(crate) fn adopt_own_timer_values(&mut self) {
        self.max_age = self.config.max_age_value();
        self.hello_time = self.config.hello_time_value();
        self.forward_delay = self.config.forward_delay_value();
    }

    pub fn set_port_priority(&mut self, no: PortNo, priority: u8) -> Result<()> {
        if !self.ports.contains_key(&no) {
            return Err(StpError::PortNotFound(no));
        }

        let new_id = port_id(priority, no);
        let designated = self.is_designated_port(no);
        let bridge_id = self.bridge_id;
        let mut reclaim = false;
        if let Some(port) = self.ports.get_mut(&no) {
            if designated {
                port.designated_port = new_id;
            }
            port.priority = priority;
            port.port_id = new_id;
            reclaim = bridge_id == port.designated_bridge && port.port_id < port.designated_port;
        }

        if self.running && reclaim {
            self.become_designated_port(no);
            self.port_state_selection();
        }
        self.reconfigure();
        Ok(())
    }

    pub fn set_path_cost(&mut self, no: PortNo, path_cost: u32) -> Result<()> {
        check_path_cost(path_cost)?;
        let port = self.ports.get_mut(&no).ok_or(StpError::PortNotFound(no))?;
        port.path_cost = path_cost;
        self.reconfigure();
        Ok(())
    }

    /// Administrative up/down. A port that is administratively down stays Disabled whatever its
    /// link status says.
    pub fn set_port_enabled(&mut self, no: PortNo, enabled: bool) -> Result<()> {
        let port = self.ports.get_mut(&no).ok_or(StpError::PortNotFound(no))?;
        port.admin_up = enabled;
        let state = port.state;
        if !self.running {
            return Ok(());
        }

        if enabled && state == PortState::Disabled && self.port_is_up(no) {
            self.enable_port(no);
        } else if !enabled && state != PortState::Disabled {
            self.disable_port(no);
        }
        self.reconfigure();
        Ok(())
    }

    pub fn set_change_detection(&mut self, no: PortNo, enabled: bool) -> Result<()> {
        let port = self.ports.get_mut(&no).ok_or(StpError::PortNotFound(no))?;
        port.change_detection_enabled = enabled;
        self.reconfigure();
        Ok(())
    }
}

// Accessors
impl<L: PortLink> Bridge<L> {
    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn bridge_id(&self) -> BridgeId {
        self.bridge_id
    }

    pub fn designated_root(&self) -> BridgeId {
        self.designated_root
    }

    pub fn root_path_cost(&self) -> u32 {
        self.root_path_cost
    }

    pub fn root_port(&self) -> Option<PortNo> {
        self.root_port
    }

    pub fn max_age(&self) -> TimeValue {
        self.max_age
    }

    pub fn hello_time(&self) -> TimeValue {
        self.hello_time
    }

    pub fn forward_delay(&self) -> TimeValue {
        self.forward_delay
    }

    pub fn topology_change(&self) -> bool {
        self.topology_change
    }

    pub fn topology_change_detected(&self) -> bool {
        self.topology_change_detected
    }

    pub fn hello_timer(&self) -> &StpTimer {
        &self.hello_timer
    }

    pub fn tcn_timer(&self) -> &StpTimer {
        &self.tcn_timer
    }

    pub fn topology_change_timer(&self) -> &StpTimer {
        &self.topology_change_timer
    }

    pub fn port(&self, no: PortNo) -> Option<&Port> {
        self.ports.get(&no)
    }

    /// Ports in port-number order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// Ports that currently designate this bridge on their segment.
    pub fn designated_ports(&self) -> Vec<PortNo> {
        self.ports
            .keys()
            .copied()
            .filter(|no| self.is_designated_port(*no))
            .collect()
    }

    /// Ports in the given state.
    pub fn ports_in_state(&self, state: PortState) -> Vec<PortNo> {
        self.ports
            .values()
            .filter(|p| p.state == state)
            .map(|p| p.no)
            .collect()
    }

    pub fn status(&self) -> BridgeStatus {
        BridgeStatus {
            running: self.running,
            bridge_id: self.bridge_id,
            designated_root: self.designated_root,
            root_path_cost: self.root_path_cost,
            root_port: self.root_port,
            max_age: self.max_age,
            hello_time: self.hello_time,
            forward_delay: self.forward_delay,
            topology_change: self.topology_change,
            topology_change_detected: self.topology_change_detected,
            hello_timer: self.hello_timer,
            tcn_timer: self.tcn_timer,
            topology_change_timer: self.topology_change_timer,
            ports: self.ports.values().cloned().collect(),
        }
    }
}
