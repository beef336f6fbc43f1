use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, StpError};
use crate::ethernet::ByteSerializable;

use super::{BridgeId, PortId, TimeValue};

/// LLC service access point used by 802.1D bridges.
pub const LLC_STP_SAP: u8 = 0x42;
/// LLC unnumbered information control field.
pub const LLC_UI: u8 = 0x03;

pub const PROTOCOL_ID: u16 = 0x0000;
pub const PROTOCOL_VERSION: u8 = 0x00;

pub const MSGTYPE_CONFIG: u8 = 0x00;
pub const MSGTYPE_TCN: u8 = 0x80;

pub const FLAG_TOPOLOGY_CHANGE: u8 = 0x01;
pub const FLAG_TOPOLOGY_CHANGE_ACK: u8 = 0x80;

const LLC_LEN: usize = 3;
/// LLC header plus protocol id, version and message type.
pub const TCN_BPDU_LEN: usize = LLC_LEN + 4;
pub const CONFIG_BPDU_LEN: usize = LLC_LEN + 35;

/// The configuration information a designated bridge advertises on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigBpdu {
    pub root_id: BridgeId,
    pub root_path_cost: u32,
    pub bridge_id: BridgeId,
    pub port_id: PortId,
    pub message_age: TimeValue,
    pub max_age: TimeValue,
    pub hello_time: TimeValue,
    pub forward_delay: TimeValue,
    pub topology_change: bool,
    pub topology_change_ack: bool,
}

impl ConfigBpdu {
    pub fn flags(&self) -> u8 {
        let mut flags = 0x00;

        if self.topology_change {
            flags |= FLAG_TOPOLOGY_CHANGE;
        }

        if self.topology_change_ack {
            flags |= FLAG_TOPOLOGY_CHANGE_ACK;
        }

        flags
    }
}

/// A decoded bridge protocol data unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bpdu {
    Config(ConfigBpdu),
    /// Topology change notification; carries nothing beyond its type.
    Tcn,
}

impl Bpdu {
    pub fn message_type(&self) -> u8 {
        match self {
            Bpdu::Config(_) => MSGTYPE_CONFIG,
            Bpdu::Tcn => MSGTYPE_TCN,
        }
    }
}

fn truncated(expected: usize, actual: usize) -> StpError {
    StpError::Truncated { expected, actual }
}

impl ByteSerializable for Bpdu {
    /// Decodes an LLC-wrapped BPDU. Trailing bytes (frame padding) are ignored. The protocol
    /// version is not checked so that later protocol versions still interoperate with their legacy
    /// fields.
    fn from_bytes(bytes: &[u8]) -> Result<Bpdu> {
        if bytes.len() < TCN_BPDU_LEN {
            return Err(truncated(TCN_BPDU_LEN, bytes.len()));
        }

        let mut buf = bytes;
        let (dsap, ssap, control) = (buf.get_u8(), buf.get_u8(), buf.get_u8());
        if dsap != LLC_STP_SAP || ssap != LLC_STP_SAP || control != LLC_UI {
            return Err(StpError::InvalidLlc {
                dsap,
                ssap,
                control,
            });
        }

        let protocol_id = buf.get_u16();
        if protocol_id != PROTOCOL_ID {
            return Err(StpError::UnknownProtocol(protocol_id));
        }

        let _version = buf.get_u8();
        match buf.get_u8() {
            MSGTYPE_TCN => Ok(Bpdu::Tcn),
            MSGTYPE_CONFIG => {
                if bytes.len() < CONFIG_BPDU_LEN {
                    return Err(truncated(CONFIG_BPDU_LEN, bytes.len()));
                }

                let flags = buf.get_u8();
                Ok(Bpdu::Config(ConfigBpdu {
                    root_id: BridgeId(buf.get_u64()),
                    root_path_cost: buf.get_u32(),
                    bridge_id: BridgeId(buf.get_u64()),
                    port_id: buf.get_u16(),
                    message_age: buf.get_u16(),
                    max_age: buf.get_u16(),
                    hello_time: buf.get_u16(),
                    forward_delay: buf.get_u16(),
                    topology_change: flags & FLAG_TOPOLOGY_CHANGE != 0,
                    topology_change_ack: flags & FLAG_TOPOLOGY_CHANGE_ACK != 0,
                }))
            }
            other => Err(StpError::UnknownMessageType(other)),
        }
    }

    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(CONFIG_BPDU_LEN);
        buf.put_u8(LLC_STP_SAP);
        buf.put_u8(LLC_STP_SAP);
        buf.put_u8(LLC_UI);
        buf.put_u16(PROTOCOL_ID);
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u8(self.message_type());

        if let Bpdu::Config(cu) = self {
            buf.put_u8(cu.flags());
            // The 64-bit identifiers are priority (2 bytes) then address (6 bytes), big-endian
            buf.put_u64(cu.root_id.0);
            buf.put_u32(cu.root_path_cost);
            buf.put_u64(cu.bridge_id.0);
            buf.put_u16(cu.port_id);
            buf.put_u16(cu.message_age);
            buf.put_u16(cu.max_age);
            buf.put_u16(cu.hello_time);
            buf.put_u16(cu.forward_delay);
        }

        buf.freeze()
    }
}
