use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, StpError};

/// A data link physical address
pub type MacAddress = [u8; 6];

/// Bridge group address; frames sent here are for the spanning tree entity of a bridge.
pub const STP_GROUP_ADDRESS: MacAddress = [0x01, 0x80, 0xC2, 0x00, 0x00, 0x00];

/// Creates a MAC address from a u64
#[macro_export]
macro_rules! mac_addr {
    ($num:expr) => {{
        let num = $num as u64;
        [
            // Clear the least significant bit to avoid multicast
            (((num >> 40) & 0xff) as u8 & 0xFE),
            ((num >> 32) & 0xff) as u8,
            ((num >> 24) & 0xff) as u8,
            ((num >> 16) & 0xff) as u8,
            ((num >> 8) & 0xff) as u8,
            (num & 0xff) as u8,
        ]
    }};
}

/// Broadcast MAC address
#[macro_export]
macro_rules! mac_broadcast_addr {
    () => {
        [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
    };
}

/// BPDU MAC address for Spanning Tree Protocol
#[macro_export]
macro_rules! mac_bpdu_addr {
    () => {
        $crate::ethernet::STP_GROUP_ADDRESS
    };
}

/// Returns true if the address is a multicast or broadcast address
#[macro_export]
macro_rules! is_mac_multicast_or_broadcast {
    ($address:expr) => {
        $address[0] & 0x01 == 0x01 || $address == $crate::mac_broadcast_addr!()
    };
}

/// Formats an address as `aa:bb:cc:dd:ee:ff`.
pub fn format_mac(address: &MacAddress) -> String {
    address
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

pub trait ByteSerializable {
    /// Convert a byte slice to a struct
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;

    /// Convert the struct to its wire representation
    fn to_bytes(&self) -> Bytes;
}

/// Largest value of the length field before it is read as an EtherType.
const MAX_802_3_LENGTH: usize = 1500;
const HEADER_LEN: usize = 14;
const MIN_FRAME_LEN: usize = 60;

/// IEEE 802.3 Ethernet header and payload, without preamble or frame check sequence.
///
/// The payload starts with the LLC header; for spanning tree traffic that is `0x42 0x42 0x03`.
#[derive(Debug, PartialEq, Clone)]
pub struct Ethernet802_3Frame {
    pub destination_address: MacAddress,
    pub source_address: MacAddress,
    pub payload: Bytes,
}

impl Ethernet802_3Frame {
    pub fn new(
        destination_address: MacAddress,
        source_address: MacAddress,
        payload: Bytes,
    ) -> Self {
        Self {
            destination_address,
            source_address,
            payload,
        }
    }
}

impl ByteSerializable for Ethernet802_3Frame {
    fn from_bytes(bytes: &[u8]) -> Result<Ethernet802_3Frame> {
        if bytes.len() < HEADER_LEN {
            return Err(StpError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let mut destination_address = [0u8; 6];
        destination_address.copy_from_slice(&bytes[0..6]);
        let mut source_address = [0u8; 6];
        source_address.copy_from_slice(&bytes[6..12]);

        let length = u16::from_be_bytes([bytes[12], bytes[13]]) as usize;
        if length > MAX_802_3_LENGTH {
            // An EtherType, so this is Ethernet II and carries no LLC payload
            return Err(StpError::NotLlc(length as u16));
        }

        let available = bytes.len() - HEADER_LEN;
        if available < length {
            return Err(StpError::Truncated {
                expected: HEADER_LEN + length,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            destination_address,
            source_address,
            payload: Bytes::copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + length]),
        })
    }

    /// Pads short frames with zeroes up to the 60 byte minimum; the length field excludes the pad.
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MIN_FRAME_LEN.max(HEADER_LEN + self.payload.len()));
        buf.put_slice(&self.destination_address);
        buf.put_slice(&self.source_address);
        buf.put_u16(self.payload.len() as u16);
        buf.put_slice(&self.payload);
        if buf.len() < MIN_FRAME_LEN {
            buf.put_bytes(0, MIN_FRAME_LEN - buf.len());
        }
        buf.freeze()
    }
}
