//! IEEE 802.1D spanning tree protocol engine for a learning bridge.
//!
//! The engine elects a root bridge, a root port and designated ports, and drives each port through
//! Blocking, Listening, Learning and Forwarding so that frames only travel along a loop-free tree.
//! Frame transmission, the learned-address table and link state stay with the host, reached
//! through [`link::PortLink`].

pub mod config;
pub mod error;
pub mod ethernet;
pub mod lan;
pub mod link;
pub mod stp;
pub mod tick;

pub use config::{BridgeConfig, PortConfig};
pub use error::{Result, StpError};
pub use link::{FrameQueue, LinkStatus, PortLink};
pub use stp::{Bridge, BridgeId, FrameDisposition, PortNo, PortState};
pub use tick::Tickable;
