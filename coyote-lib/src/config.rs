//! Startup configuration: the power scaling shared by every encoder and the
//! per-device settings file.
//!
//! Both are loaded once and never mutated afterwards. Encoders take a
//! `&PowerConfig` explicitly instead of reading a global.

use crate::constants::{DEFAULT_MAX_POWER, DEFAULT_POWER_STEP, MAX_CHANNEL_POWER, MAX_POWER_LEVEL};
use crate::error::CoyoteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Power scaling between the app's 0-100 scale and device units.
///
/// Invariants: `step >= 1`, `max_power <= 2047` and `100 * step <= max_power`,
/// so any saturated level times `step` fits an 11-bit channel field and stays
/// under the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PowerConfigFields", into = "PowerConfigFields")]
pub struct PowerConfig {
    step: u8,
    max_power: u16,
}

#[derive(Serialize, Deserialize)]
struct PowerConfigFields {
    step: u8,
    max_power: u16,
}

impl PowerConfig {
    pub fn new(step: u8, max_power: u16) -> Result<Self, CoyoteError> {
        if step == 0 {
            return Err(CoyoteError::InvalidConfig("step must be at least 1".to_string()));
        }
        if max_power > MAX_CHANNEL_POWER {
            return Err(CoyoteError::InvalidConfig(format!(
                "max_power {} exceeds the 11-bit channel limit {}",
                max_power, MAX_CHANNEL_POWER
            )));
        }
        let top = u16::from(MAX_POWER_LEVEL) * u16::from(step);
        if top > max_power {
            return Err(CoyoteError::InvalidConfig(format!(
                "step {} reaches {} at level {}, above max_power {}",
                step, top, MAX_POWER_LEVEL, max_power
            )));
        }
        Ok(Self { step, max_power })
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn max_power(&self) -> u16 {
        self.max_power
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_POWER_STEP,
            max_power: DEFAULT_MAX_POWER,
        }
    }
}

impl TryFrom<PowerConfigFields> for PowerConfig {
    type Error = CoyoteError;

    fn try_from(fields: PowerConfigFields) -> Result<Self, Self::Error> {
        PowerConfig::new(fields.step, fields.max_power)
    }
}

impl From<PowerConfig> for PowerConfigFields {
    fn from(config: PowerConfig) -> Self {
        Self {
            step: config.step,
            max_power: config.max_power,
        }
    }
}

/// Bluetooth device address of the Coyote, e.g. `e2:8b:7b:01:02:03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = CoyoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoyoteError::InvalidMacAddress(s.to_string());
        let mut octets = [0u8; 6];
        let mut parts = s.trim().split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = CoyoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}

/// One Wi-Fi network the controller may join for firmware updates.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Contents of the per-device settings file.
///
/// ```json
/// {
///   "mac_address": "e2:8b:7b:01:02:03",
///   "wifi": [{ "ssid": "home", "password": "secret" }],
///   "power": { "step": 7, "max_power": 2000 }
/// }
/// ```
///
/// `wifi` and `power` are optional; `power` defaults to step 7 / max 2000.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub mac_address: MacAddress,
    #[serde(default)]
    pub wifi: Vec<WifiCredentials>,
    #[serde(default)]
    pub power: PowerConfig,
}

impl DeviceSettings {
    pub fn from_json(text: &str) -> Result<Self, CoyoteError> {
        let settings: DeviceSettings = serde_json::from_str(text)?;
        debug!(
            mac = %settings.mac_address,
            networks = settings.wifi.len(),
            step = settings.power.step(),
            max_power = settings.power.max_power(),
            "Parsed device settings"
        );
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoyoteError> {
        let path = path.as_ref();
        info!("Loading device settings from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PowerConfig::default();
        assert_eq!(PowerConfig::new(config.step(), config.max_power()).unwrap(), config);
    }

    #[test]
    fn mac_display_is_lowercase() {
        let mac: MacAddress = "E2:8B:7B:0A:1B:FF".parse().unwrap();
        assert_eq!(mac.to_string(), "e2:8b:7b:0a:1b:ff");
    }

    #[test]
    fn wifi_debug_hides_password() {
        let creds = WifiCredentials {
            ssid: "home".to_string(),
            password: "hunter2".to_string(),
        };
        let text = format!("{:?}", creds);
        assert!(text.contains("home"));
        assert!(!text.contains("hunter2"));
    }
}
