// Timeouts, topics, rover configuration
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::motor::protocol::{
    Channel, RoverError, WheelPosition, DEFAULT_BAUDRATE, DEFAULT_PORT, DEFAULT_TIMEOUT_MS,
};

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Health goes stale when no command arrives within this window
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_BASE: &str = "rover/cmd/base"; // commands
pub const TOPIC_RT_BASE: &str = "rover/rt/base"; // commanded wheel speeds
pub const TOPIC_HEALTH: &str = "rover/state/health"; // health status

/// Error types for loading a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] RoverError),
}

/// Channel assignment and speed scale for one wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    /// Controller channel, 1 to 4
    pub channel: u8,
    /// Multiplier applied to this wheel's speed before encoding
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl WheelConfig {
    fn for_position(position: WheelPosition) -> Self {
        Self {
            channel: position.default_channel().number(),
            alpha: default_alpha(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelsConfig {
    pub front_left: WheelConfig,
    pub front_right: WheelConfig,
    pub rear_left: WheelConfig,
    pub rear_right: WheelConfig,
}

impl Default for WheelsConfig {
    fn default() -> Self {
        Self {
            front_left: WheelConfig::for_position(WheelPosition::FrontLeft),
            front_right: WheelConfig::for_position(WheelPosition::FrontRight),
            rear_left: WheelConfig::for_position(WheelPosition::RearLeft),
            rear_right: WheelConfig::for_position(WheelPosition::RearRight),
        }
    }
}

impl WheelsConfig {
    pub fn get(&self, position: WheelPosition) -> &WheelConfig {
        match position {
            WheelPosition::FrontLeft => &self.front_left,
            WheelPosition::FrontRight => &self.front_right,
            WheelPosition::RearLeft => &self.rear_left,
            WheelPosition::RearRight => &self.rear_right,
        }
    }
}

/// Rover hardware configuration
///
/// Every field has a default, so a JSON file only needs the values it changes:
///
/// ```json
/// { "port": "/dev/ttyUSB0", "wheels": { "rear_left": { "channel": 4 }, "rear_right": { "channel": 3 } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    /// Serial device of the motor controller
    pub port: String,
    pub baud_rate: u32,
    /// Serial write timeout in milliseconds
    pub timeout_ms: u64,
    pub wheels: WheelsConfig,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUDRATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            wheels: WheelsConfig::default(),
        }
    }
}

impl RoverConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: RoverConfig = serde_json::from_str(text)?;
        config.channels()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validated channel for each wheel, in `WheelPosition::ALL` order.
    ///
    /// Fails on a channel outside 1..=4 or one shared by two wheels.
    pub fn channels(&self) -> Result<[Channel; 4], RoverError> {
        let mut seen = HashSet::new();
        let mut channels = [WheelPosition::FrontLeft.default_channel(); 4];

        for (slot, position) in channels.iter_mut().zip(WheelPosition::ALL) {
            let channel = Channel::try_from(self.wheels.get(position).channel)?;
            if !seen.insert(channel) {
                return Err(RoverError::DuplicateChannel {
                    channel: channel.number(),
                });
            }
            *slot = channel;
        }

        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoverConfig::default();
        assert_eq!(config.port, "/dev/ttyUSB_Rover");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout(), Duration::from_millis(100));

        let numbers: Vec<u8> = config.channels().unwrap().iter().map(|c| c.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        for position in WheelPosition::ALL {
            assert_eq!(config.wheels.get(position).alpha, 1.0);
        }
    }

    #[test]
    fn test_partial_json() {
        let config = RoverConfig::from_json(
            r#"{ "port": "/dev/ttyUSB0", "wheels": { "rear_left": { "channel": 4, "alpha": 0.5 }, "rear_right": { "channel": 3 } } }"#,
        )
        .unwrap();

        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, DEFAULT_BAUDRATE);
        assert_eq!(config.wheels.rear_left, WheelConfig { channel: 4, alpha: 0.5 });
        assert_eq!(config.wheels.rear_right.alpha, 1.0);
        assert_eq!(config.wheels.front_left.channel, 1);
    }

    #[test]
    fn test_invalid_channel() {
        for bad in [0, 5, 255] {
            let mut config = RoverConfig::default();
            config.wheels.front_right.channel = bad;
            assert!(matches!(
                config.channels(),
                Err(RoverError::InvalidChannel(n)) if n == bad
            ));
        }

        let err = RoverConfig::from_json(r#"{ "wheels": { "front_left": { "channel": 0 } } }"#);
        assert!(matches!(
            err,
            Err(ConfigError::Invalid(RoverError::InvalidChannel(0)))
        ));
    }

    #[test]
    fn test_duplicate_channel() {
        let mut config = RoverConfig::default();
        config.wheels.rear_right.channel = 1;
        assert!(matches!(
            config.channels(),
            Err(RoverError::DuplicateChannel { channel: 1 })
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            RoverConfig::from_json("{ port: "),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RoverConfig::load("/nonexistent/rover.json"),
            Err(ConfigError::Read { .. })
        ));
    }
}
