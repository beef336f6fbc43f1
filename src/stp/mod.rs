//! IEEE 802.1D spanning tree protocol engine.
//!
//! A [`Bridge`] owns its ports and every protocol timer. The host drives it through two entry
//! points, [`Bridge::input`] for frames addressed to the bridge group address and
//! [`crate::tick::Tickable::tick`] once per second, plus the administrative setters. All topology
//! decisions go through the same primitives in `selection` and `state`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::ethernet::{format_mac, MacAddress};

pub mod bpdu;
pub mod bridge;
pub mod port;

mod input;
mod selection;
mod state;
mod timers;
mod topology;
mod transmit;

pub use bpdu::{Bpdu, ConfigBpdu};
pub use bridge::{Bridge, BridgeStatus};
pub use input::FrameDisposition;
pub use port::{Port, PortState};
pub use selection::supersedes_port_info;

/// Time values are carried in 1/256 second units, on the wire and in every timer.
pub type TimeValue = u16;

pub const DEFAULT_MAX_AGE: TimeValue = 20 * 256;
pub const DEFAULT_HELLO_TIME: TimeValue = 2 * 256;
pub const DEFAULT_FORWARD_DELAY: TimeValue = 15 * 256;
pub const DEFAULT_HOLD_TIME: TimeValue = 256;
pub const DEFAULT_BRIDGE_PRIORITY: u16 = 0x8000;
pub const DEFAULT_PORT_PRIORITY: u8 = 0x80;
pub const DEFAULT_PATH_COST: u32 = 55;

/// Added to the root port's message age when relaying configuration information.
pub const MESSAGE_AGE_INCREMENT: TimeValue = 256;

/// Port numbers are the low eight bits of the port identifier; zero is reserved.
pub const MAX_PORTS: usize = 255;

/// Converts whole seconds to 1/256 second units.
#[macro_export]
macro_rules! stp_seconds {
    ($secs:expr) => {
        (($secs) as u16) << 8
    };
}

/// Take in a u8 array as a MAC address and a u16 as a priority to create a bridge ID.
#[macro_export]
macro_rules! bridge_id {
    ($mac:expr, $priority:expr) => {
        $crate::stp::BridgeId::new($priority as u16, $mac)
    };
}

/// Bridge identifier: 16-bit priority in the high bits, 48-bit address below. Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BridgeId(pub u64);

impl BridgeId {
    pub fn new(priority: u16, address: MacAddress) -> Self {
        let mut id = priority as u64;
        for byte in address {
            id = (id << 8) | byte as u64;
        }
        BridgeId(id)
    }

    pub fn priority(&self) -> u16 {
        (self.0 >> 48) as u16
    }

    pub fn address(&self) -> MacAddress {
        let bytes = self.0.to_be_bytes();
        let mut address = [0u8; 6];
        address.copy_from_slice(&bytes[2..8]);
        address
    }

    /// Same address, different priority.
    pub fn with_priority(&self, priority: u16) -> Self {
        BridgeId::new(priority, self.address())
    }
}

impl fmt::Display for BridgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}.{}", self.priority(), format_mac(&self.address()))
    }
}

// Written as "priority.address"; the packed value does not fit a signed 64-bit integer
impl Serialize for BridgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Stable index of a port within its bridge (the interface index, truncated to eight bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PortNo(pub u8);

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Port identifier: port priority in the high byte, port number in the low byte.
pub type PortId = u16;

pub fn port_id(priority: u8, no: PortNo) -> PortId {
    ((priority as u16) << 8) | no.0 as u16
}
