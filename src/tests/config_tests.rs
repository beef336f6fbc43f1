#![allow(non_snake_case)]

use crate::config::{BridgeConfig, PortConfig};
use crate::stp::{
    DEFAULT_BRIDGE_PRIORITY, DEFAULT_FORWARD_DELAY, DEFAULT_HELLO_TIME, DEFAULT_HOLD_TIME,
    DEFAULT_MAX_AGE, DEFAULT_PATH_COST, DEFAULT_PORT_PRIORITY, MAX_PORTS,
};
use crate::{stp_seconds, StpError};

#[test]
fn BridgeConfig_Default_UsesProtocolDefaults() {
    // Act
    let config = BridgeConfig::default();

    // Assert
    assert_eq!(config.priority, DEFAULT_BRIDGE_PRIORITY);
    assert_eq!(config.max_age, 20);
    assert_eq!(config.hello_time, 2);
    assert_eq!(config.forward_delay, 15);
    assert_eq!(config.hold_time, 1);
    assert_eq!(config.max_ports, MAX_PORTS);
    assert_eq!(config.max_age_value(), DEFAULT_MAX_AGE);
    assert_eq!(config.hello_time_value(), DEFAULT_HELLO_TIME);
    assert_eq!(config.forward_delay_value(), DEFAULT_FORWARD_DELAY);
    assert_eq!(config.hold_time_value(), DEFAULT_HOLD_TIME);
    assert!(config.validate().is_ok());
}

#[test]
fn PortConfig_Default_UsesProtocolDefaults() {
    // Act
    let config = PortConfig::default();

    // Assert
    assert_eq!(config.priority, DEFAULT_PORT_PRIORITY);
    assert_eq!(config.path_cost, DEFAULT_PATH_COST);
    assert!(config.change_detection);
}

#[test]
fn FromTomlStr_PartialDocument_FillsDefaults() {
    // Arrange
    let text = r#"
        priority = 4096
        forward_delay = 10
    "#;

    // Act
    let config = BridgeConfig::from_toml_str(text).unwrap();

    // Assert
    assert_eq!(config.priority, 4096);
    assert_eq!(config.forward_delay_value(), stp_seconds!(10));
    assert_eq!(config.max_age, 20);
    assert_eq!(config.hello_time, 2);
}

#[test]
fn FromTomlStr_EmptyDocument_EqualsDefault() {
    // Act & Assert
    assert_eq!(BridgeConfig::from_toml_str("").unwrap(), BridgeConfig::default());
}

#[test]
fn FromTomlStr_OutOfRange_ReturnsInvalidParameter() {
    // Act
    let result = BridgeConfig::from_toml_str("forward_delay = 31");

    // Assert
    match result {
        Err(StpError::InvalidParameter { name, reason }) => {
            assert_eq!(name, "forward_delay");
            assert!(reason.contains("4..=30"));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn FromTomlStr_Malformed_ReturnsConfigError() {
    // Act
    let result = BridgeConfig::from_toml_str("priority = \"high\"");

    // Assert
    assert!(matches!(result, Err(StpError::Config(_))));
}

#[test]
fn Validate_RangeBoundaries_Accepted() {
    // Arrange
    let low = BridgeConfig {
        max_age: 6,
        hello_time: 1,
        forward_delay: 4,
        hold_time: 1,
        max_ports: 1,
        ..Default::default()
    };
    let high = BridgeConfig {
        max_age: 40,
        hello_time: 10,
        forward_delay: 30,
        hold_time: 10,
        max_ports: MAX_PORTS,
        ..Default::default()
    };

    // Act & Assert
    assert!(low.validate().is_ok());
    assert!(high.validate().is_ok());
}

#[test]
fn Validate_NoPorts_ReturnsInvalidParameter() {
    // Arrange
    let config = BridgeConfig {
        max_ports: 0,
        ..Default::default()
    };

    // Act & Assert
    assert!(matches!(
        config.validate(),
        Err(StpError::InvalidParameter { name: "max_ports", .. })
    ));
}

#[test]
fn PortConfig_ZeroPathCost_ReturnsInvalidParameter() {
    // Act & Assert
    assert!(PortConfig::default().with_path_cost(0).validate().is_err());
    assert!(PortConfig::default().with_path_cost(1).validate().is_ok());
}

#[test]
fn StpError_DecodeErrors_Classified() {
    // Act & Assert
    assert!(StpError::NotLlc(0x0800).is_decode_error());
    assert!(StpError::UnknownMessageType(0x02).is_decode_error());
    assert!(!StpError::Config("bad".into()).is_decode_error());
}
