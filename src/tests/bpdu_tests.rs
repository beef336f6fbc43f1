#![allow(non_snake_case)]

use crate::error::StpError;
use crate::ethernet::ByteSerializable;
use crate::mac_addr;
use crate::stp::bpdu::*;
use crate::stp::{Bpdu, BridgeId, ConfigBpdu};

fn sample() -> ConfigBpdu {
    ConfigBpdu {
        root_id: BridgeId::new(0x1000, [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
        root_path_cost: 0x0102_0304,
        bridge_id: BridgeId::new(0x8000, [0x00, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE]),
        port_id: 0x8003,
        message_age: 0x0100,
        max_age: 0x1400,
        hello_time: 0x0200,
        forward_delay: 0x0F00,
        topology_change: true,
        topology_change_ack: true,
    }
}

#[test]
fn ConfigBpdu_ToBytes_MatchesWireLayout() {
    // Arrange
    let bpdu = Bpdu::Config(sample());

    // Act
    let bytes = bpdu.to_bytes();

    // Assert
    assert_eq!(bytes.len(), CONFIG_BPDU_LEN);
    assert_eq!(bytes[0..3], [0x42, 0x42, 0x03]); // LLC
    assert_eq!(bytes[3..5], [0x00, 0x00]); // Protocol id
    assert_eq!(bytes[5], 0x00); // Version
    assert_eq!(bytes[6], 0x00); // Configuration
    assert_eq!(bytes[7], 0x81); // Topology change + acknowledgement
    assert_eq!(bytes[8..10], [0x10, 0x00]); // Root priority
    assert_eq!(bytes[10..16], [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]); // Root address
    assert_eq!(bytes[16..20], [0x01, 0x02, 0x03, 0x04]); // Root path cost
    assert_eq!(bytes[20..22], [0x80, 0x00]); // Bridge priority
    assert_eq!(bytes[22..28], [0x00, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE]); // Bridge address
    assert_eq!(bytes[28..30], [0x80, 0x03]); // Port id
    assert_eq!(bytes[30..32], [0x01, 0x00]); // Message age
    assert_eq!(bytes[32..34], [0x14, 0x00]); // Max age
    assert_eq!(bytes[34..36], [0x02, 0x00]); // Hello time
    assert_eq!(bytes[36..38], [0x0F, 0x00]); // Forward delay
}

#[test]
fn ConfigBpdu_EncodeDecode_ReproducesFields() {
    // Arrange
    let bpdu = Bpdu::Config(sample());

    // Act
    let decoded = Bpdu::from_bytes(&bpdu.to_bytes());

    // Assert
    assert_eq!(decoded, Ok(bpdu));
}

#[test]
fn TcnBpdu_EncodeDecode_ReproducesFields() {
    // Act
    let bytes = Bpdu::Tcn.to_bytes();

    // Assert
    assert_eq!(bytes[..], [0x42, 0x42, 0x03, 0x00, 0x00, 0x00, 0x80]);
    assert_eq!(Bpdu::from_bytes(&bytes), Ok(Bpdu::Tcn));
}

#[test]
fn FromBytes_FlagsWithOtherBitsSet_DecodesOnlyChangeBits() {
    // Arrange
    let mut bytes = Bpdu::Config(ConfigBpdu {
        topology_change: false,
        topology_change_ack: false,
        ..sample()
    })
    .to_bytes()
    .to_vec();
    bytes[7] = 0x7E;

    // Act
    let decoded = Bpdu::from_bytes(&bytes);

    // Assert
    match decoded {
        Ok(Bpdu::Config(cu)) => {
            assert!(!cu.topology_change);
            assert!(!cu.topology_change_ack);
        }
        other => panic!("unexpected decode result {:?}", other),
    }
}

#[test]
fn FromBytes_PaddedFrame_IgnoresTrailingBytes() {
    // Arrange
    let mut bytes = Bpdu::Config(sample()).to_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 8]);

    // Act
    let decoded = Bpdu::from_bytes(&bytes);

    // Assert
    assert_eq!(decoded, Ok(Bpdu::Config(sample())));
}

#[test]
fn FromBytes_ShortConfig_ReturnsTruncated() {
    // Arrange
    let bytes = Bpdu::Config(sample()).to_bytes();

    // Act
    let decoded = Bpdu::from_bytes(&bytes[..CONFIG_BPDU_LEN - 1]);

    // Assert
    assert_eq!(
        decoded,
        Err(StpError::Truncated {
            expected: CONFIG_BPDU_LEN,
            actual: CONFIG_BPDU_LEN - 1
        })
    );
}

#[test]
fn FromBytes_ShorterThanHeader_ReturnsTruncated() {
    // Act
    let decoded = Bpdu::from_bytes(&[0x42, 0x42, 0x03, 0x00]);

    // Assert
    assert!(matches!(decoded, Err(StpError::Truncated { .. })));
}

#[test]
fn FromBytes_WrongSap_ReturnsInvalidLlc() {
    // Arrange
    let mut bytes = Bpdu::Tcn.to_bytes().to_vec();
    bytes[0] = 0xAA;

    // Act
    let decoded = Bpdu::from_bytes(&bytes);

    // Assert
    assert_eq!(
        decoded,
        Err(StpError::InvalidLlc {
            dsap: 0xAA,
            ssap: 0x42,
            control: 0x03
        })
    );
}

#[test]
fn FromBytes_NonZeroProtocolId_ReturnsUnknownProtocol() {
    // Arrange
    let mut bytes = Bpdu::Tcn.to_bytes().to_vec();
    bytes[4] = 0x01;

    // Act & Assert
    assert_eq!(Bpdu::from_bytes(&bytes), Err(StpError::UnknownProtocol(0x0001)));
}

#[test]
fn FromBytes_RapidSpanningTreeType_ReturnsUnknownMessageType() {
    // Arrange
    let mut bytes = Bpdu::Config(sample()).to_bytes().to_vec();
    bytes[5] = 0x02;
    bytes[6] = 0x02;

    // Act & Assert
    assert_eq!(Bpdu::from_bytes(&bytes), Err(StpError::UnknownMessageType(0x02)));
}

#[test]
fn FromBytes_LaterProtocolVersion_StillDecodes() {
    // Arrange
    let mut bytes = Bpdu::Tcn.to_bytes().to_vec();
    bytes[5] = 0x03;

    // Act & Assert
    assert_eq!(Bpdu::from_bytes(&bytes), Ok(Bpdu::Tcn));
}

#[test]
fn ConfigBpdu_BridgeIdFields_SplitPriorityAndAddress() {
    // Arrange
    let cu = ConfigBpdu {
        bridge_id: crate::bridge_id!(mac_addr!(0x0102_0304_0506u64), 0x7000),
        ..sample()
    };

    // Act
    let bytes = Bpdu::Config(cu).to_bytes();

    // Assert
    assert_eq!(bytes[20..22], [0x70, 0x00]);
    assert_eq!(bytes[22..28], [0x00, 0x02, 0x03, 0x04, 0x05, 0x06]);
}
