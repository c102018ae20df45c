use once_cell::sync::Lazy;
use std::time::Duration;

use crate::midi::S1000_ID;
use crate::sysex::S56K_ID;

/// How a device talks SysEx
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    /// S1000/S3000 single-byte opcodes
    Legacy,
    /// S5000/S6000 sections and items
    SectionItem,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    pub name: String,
    pub protocol: Protocol,
    /// Product id byte following the Akai id (legacy devices: the device id)
    pub product_id: u8,
    pub device_id: u8,
}

pub static _DEVICES: Lazy<Vec<DeviceConfig>> = Lazy::new(|| {
    vec![
        DeviceConfig {
            name: "S1000".to_string(),
            protocol: Protocol::Legacy,
            product_id: S1000_ID,
            device_id: S1000_ID,
        },
        DeviceConfig {
            name: "S3000XL".to_string(),
            protocol: Protocol::Legacy,
            product_id: S1000_ID,
            device_id: S1000_ID,
        },
        DeviceConfig {
            name: "S5000".to_string(),
            protocol: Protocol::SectionItem,
            product_id: S56K_ID,
            device_id: 0,
        },
        DeviceConfig {
            name: "S6000".to_string(),
            protocol: Protocol::SectionItem,
            product_id: S56K_ID,
            device_id: 0,
        },
    ]
});

pub fn configs() -> &'static Vec<DeviceConfig> {
    &_DEVICES
}

pub fn config_for_name(name: &str) -> Option<&'static DeviceConfig> {
    configs().iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Per-connection driver settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Legacy exclusive channel
    pub channel: u8,
    pub device_id: u8,
    pub user_ref: u8,
    /// `None` waits for a response forever
    pub timeout: Option<Duration>,
}

pub const LEGACY_TIMEOUT: Duration = Duration::from_secs(5);

impl DriverConfig {
    pub fn legacy() -> Self {
        DriverConfig {
            channel: 0,
            device_id: S1000_ID,
            user_ref: 0,
            timeout: Some(LEGACY_TIMEOUT),
        }
    }

    pub fn s56k() -> Self {
        DriverConfig {
            channel: 0,
            device_id: 0,
            user_ref: 0,
            timeout: None,
        }
    }

    pub fn for_device(config: &DeviceConfig) -> Self {
        match config.protocol {
            Protocol::Legacy => DriverConfig::legacy(),
            Protocol::SectionItem => DriverConfig { device_id: config.device_id, ..DriverConfig::s56k() },
        }
    }

    pub fn with_channel(self, channel: u8) -> Self {
        DriverConfig { channel, ..self }
    }
}
