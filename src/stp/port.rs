use serde::Serialize;

use crate::config::PortConfig;
use crate::ethernet::MacAddress;
use crate::tick::StpTimer;

use super::{port_id, BridgeId, PortId, PortNo};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum PortState {
    Disabled,   // Administratively or physically down; takes no part in the protocol
    Blocking,   // Receives BPDUs only
    Listening,  // Receives and transmits BPDUs, no learning, no forwarding
    Learning,   // Learns addresses, no forwarding
    Forwarding, // Learns addresses and forwards frames
}

impl PortState {
    /// True when the data path may learn source addresses on this port.
    pub fn is_learning(&self) -> bool {
        matches!(self, PortState::Learning | PortState::Forwarding)
    }

    /// True when the data path may forward frames through this port.
    pub fn is_forwarding(&self) -> bool {
        *self == PortState::Forwarding
    }
}

/// A bridge port: one interface enrolled in the bridge.
///
/// The `designated_*` fields hold the best configuration heard on the segment, or this bridge's own
/// values while the port is designated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub(crate) no: PortNo,
    pub(crate) address: MacAddress,
    pub(crate) priority: u8,
    pub(crate) port_id: PortId,
    pub(crate) path_cost: u32,
    pub(crate) state: PortState,
    pub(crate) admin_up: bool,

    pub(crate) designated_root: BridgeId,
    pub(crate) designated_cost: u32,
    pub(crate) designated_bridge: BridgeId,
    pub(crate) designated_port: PortId,

    pub(crate) topology_change_acknowledge: bool,
    pub(crate) config_pending: bool,
    pub(crate) change_detection_enabled: bool,

    pub(crate) message_age_timer: StpTimer,
    pub(crate) forward_delay_timer: StpTimer,
    pub(crate) hold_timer: StpTimer,
}

impl Port {
    pub(crate) fn new(no: PortNo, address: MacAddress, config: &PortConfig) -> Port {
        Port {
            no,
            address,
            priority: config.priority,
            port_id: port_id(config.priority, no),
            path_cost: config.path_cost,
            state: PortState::Disabled,
            admin_up: true,
            designated_root: BridgeId::default(),
            designated_cost: 0,
            designated_bridge: BridgeId::default(),
            designated_port: 0,
            topology_change_acknowledge: false,
            config_pending: false,
            change_detection_enabled: config.change_detection,
            message_age_timer: StpTimer::new(),
            forward_delay_timer: StpTimer::new(),
            hold_timer: StpTimer::new(),
        }
    }

    pub(crate) fn stop_timers(&mut self) {
        self.message_age_timer.stop();
        self.forward_delay_timer.stop();
        self.hold_timer.stop();
    }

    pub fn no(&self) -> PortNo {
        self.no
    }

    /// Hardware address of the interface; source address of every BPDU sent on this port.
    pub fn address(&self) -> MacAddress {
        self.address
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn port_id(&self) -> PortId {
        self.port_id
    }

    pub fn path_cost(&self) -> u32 {
        self.path_cost
    }

    pub fn state(&self) -> PortState {
        self.state
    }

    pub fn is_admin_up(&self) -> bool {
        self.admin_up
    }

    pub fn designated_root(&self) -> BridgeId {
        self.designated_root
    }

    pub fn designated_cost(&self) -> u32 {
        self.designated_cost
    }

    pub fn designated_bridge(&self) -> BridgeId {
        self.designated_bridge
    }

    pub fn designated_port(&self) -> PortId {
        self.designated_port
    }

    pub fn topology_change_acknowledge(&self) -> bool {
        self.topology_change_acknowledge
    }

    pub fn config_pending(&self) -> bool {
        self.config_pending
    }

    pub fn change_detection_enabled(&self) -> bool {
        self.change_detection_enabled
    }

    pub fn message_age_timer(&self) -> &StpTimer {
        &self.message_age_timer
    }

    pub fn forward_delay_timer(&self) -> &StpTimer {
        &self.forward_delay_timer
    }

    pub fn hold_timer(&self) -> &StpTimer {
        &self.hold_timer
    }
}
