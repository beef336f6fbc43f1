//! Bridge and port configuration.
//!
//! Timer values are configured in whole seconds, the way administrators state them, and converted
//! to 1/256 second protocol units when the bridge is built.
//!
//! ```toml
//! priority = 32768
//! max_age = 20
//! hello_time = 2
//! forward_delay = 15
//! hold_time = 1
//! ```

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StpError};
use crate::stp::{
    TimeValue, DEFAULT_BRIDGE_PRIORITY, DEFAULT_FORWARD_DELAY, DEFAULT_HELLO_TIME,
    DEFAULT_HOLD_TIME, DEFAULT_MAX_AGE, DEFAULT_PATH_COST, DEFAULT_PORT_PRIORITY, MAX_PORTS,
};

pub const MAX_AGE_RANGE: RangeInclusive<u8> = 6..=40;
pub const HELLO_TIME_RANGE: RangeInclusive<u8> = 1..=10;
pub const FORWARD_DELAY_RANGE: RangeInclusive<u8> = 4..=30;
pub const HOLD_TIME_RANGE: RangeInclusive<u8> = 1..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub priority: u16,
    /// Seconds
    pub max_age: u8,
    /// Seconds
    pub hello_time: u8,
    /// Seconds
    pub forward_delay: u8,
    /// Seconds
    pub hold_time: u8,
    /// Port records the bridge will allocate
    pub max_ports: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_BRIDGE_PRIORITY,
            max_age: (DEFAULT_MAX_AGE >> 8) as u8,
            hello_time: (DEFAULT_HELLO_TIME >> 8) as u8,
            forward_delay: (DEFAULT_FORWARD_DELAY >> 8) as u8,
            hold_time: (DEFAULT_HOLD_TIME >> 8) as u8,
            max_ports: MAX_PORTS,
        }
    }
}

pub(crate) fn check_range(name: &'static str, value: u8, range: RangeInclusive<u8>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }

    Err(StpError::invalid(
        name,
        format!(
            "{} seconds is outside {}..={}",
            value,
            range.start(),
            range.end()
        ),
    ))
}

impl BridgeConfig {
    /// Parses a flat TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BridgeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_range("max_age", self.max_age, MAX_AGE_RANGE)?;
        check_range("hello_time", self.hello_time, HELLO_TIME_RANGE)?;
        check_range("forward_delay", self.forward_delay, FORWARD_DELAY_RANGE)?;
        check_range("hold_time", self.hold_time, HOLD_TIME_RANGE)?;

        if self.max_ports == 0 || self.max_ports > MAX_PORTS {
            return Err(StpError::invalid(
                "max_ports",
                format!("{} is outside 1..={}", self.max_ports, MAX_PORTS),
            ));
        }
        Ok(())
    }

    pub fn max_age_value(&self) -> TimeValue {
        crate::stp_seconds!(self.max_age)
    }

    pub fn hello_time_value(&self) -> TimeValue {
        crate::stp_seconds!(self.hello_time)
    }

    pub fn forward_delay_value(&self) -> TimeValue {
        crate::stp_seconds!(self.forward_delay)
    }

    pub fn hold_time_value(&self) -> TimeValue {
        crate::stp_seconds!(self.hold_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    pub priority: u8,
    pub path_cost: u32,
    pub change_detection: bool,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PORT_PRIORITY,
            path_cost: DEFAULT_PATH_COST,
            change_detection: true,
        }
    }
}

impl PortConfig {
    pub fn with_path_cost(mut self, path_cost: u32) -> Self {
        self.path_cost = path_cost;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_path_cost(self.path_cost)
    }
}

pub(crate) fn check_path_cost(path_cost: u32) -> Result<()> {
    if path_cost < 1 {
        return Err(StpError::invalid("path_cost", "must be at least 1"));
    }
    Ok(())
}
