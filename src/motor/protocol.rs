// Rover motor controller serial protocol
//
// ASCII frames, one command per line:
//   w<direction> <register> <hex payload>\n
// Speed frames carry a signed 16-bit value, little-endian, as 4 lowercase hex digits.

use serialport::{self, SerialPort};
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

/// Default serial configuration for the rover motor controller
pub const DEFAULT_PORT: &str = "/dev/ttyUSB_Rover";
pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Hardware safety limit for speed commands (device units)
pub const MAX_SPEED: i16 = 1300;

/// Proportional speed gain register. Must be zero for serial speed commands to take effect.
pub const GAIN_REGISTER: u8 = 0x20;

/// Frame prefix and terminator
const WRITE_PREFIX: char = 'w';
const TERMINATOR: char = '\n';

/// Which of the two command channels per side a frame targets.
///
/// The controller models front motors as the "forward" channel and rear motors
/// as the "backward" channel of the same register pair.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionCode {
    Forward = 0x1F,
    Backward = 0x10,
}

impl DirectionCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x1F => Some(Self::Forward),
            0x10 => Some(Self::Backward),
            _ => None,
        }
    }
}

/// Target speed register for each side of the rover
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorAddress {
    Left = 0xAC,
    Right = 0xAE,
}

impl MotorAddress {
    pub fn from_register(register: u8) -> Option<Self> {
        match register {
            0xAC => Some(Self::Left),
            0xAE => Some(Self::Right),
            _ => None,
        }
    }
}

/// Wheel positions in command order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelPosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelPosition {
    /// All wheels, in the order frames are sent
    pub const ALL: [WheelPosition; 4] = [
        WheelPosition::FrontLeft,
        WheelPosition::FrontRight,
        WheelPosition::RearLeft,
        WheelPosition::RearRight,
    ];

    /// Channel this wheel is wired to on a stock rover
    pub fn default_channel(self) -> Channel {
        match self {
            WheelPosition::FrontLeft => Channel(1),
            WheelPosition::FrontRight => Channel(2),
            WheelPosition::RearLeft => Channel(3),
            WheelPosition::RearRight => Channel(4),
        }
    }
}

impl fmt::Display for WheelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WheelPosition::FrontLeft => "front-left",
            WheelPosition::FrontRight => "front-right",
            WheelPosition::RearLeft => "rear-left",
            WheelPosition::RearRight => "rear-right",
        };
        f.write_str(name)
    }
}

/// Motor channel on the controller, 1 to 4 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel(u8);

impl Channel {
    pub fn number(self) -> u8 {
        self.0
    }

    /// Register and direction code this channel is driven through.
    ///
    /// Fixed hardware table, do not reorder:
    /// 1 = left/forward, 2 = right/forward, 3 = left/backward, 4 = right/backward.
    pub fn target(self) -> (MotorAddress, DirectionCode) {
        match self.0 {
            1 => (MotorAddress::Left, DirectionCode::Forward),
            2 => (MotorAddress::Right, DirectionCode::Forward),
            3 => (MotorAddress::Left, DirectionCode::Backward),
            4 => (MotorAddress::Right, DirectionCode::Backward),
            n => unreachable!("channel {} escaped validation", n),
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = RoverError;

    fn try_from(number: u8) -> Result<Self> {
        if (1..=4).contains(&number) {
            Ok(Channel(number))
        } else {
            Err(RoverError::InvalidChannel(number))
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error types for rover communication and wheel wiring
#[derive(Debug, thiserror::Error)]
pub enum RoverError {
    #[error("Motor device {port} not available: {source}")]
    DeviceAbsent {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Invalid motor channel {0}: must be between 1 and 4 inclusive")]
    InvalidChannel(u8),

    #[error("Motor channel {channel} assigned to more than one wheel")]
    DuplicateChannel { channel: u8 },

    #[error("Failed to write {} frame: {source}", frame_label(.wheel))]
    TransportWrite {
        wheel: Option<WheelPosition>,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed frame {frame:?}: {reason}")]
    MalformedFrame { frame: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RoverError>;

fn frame_label(wheel: &Option<WheelPosition>) -> String {
    wheel.map_or_else(|| "init".to_string(), |w| w.to_string())
}

/// Convert a requested speed to the device range.
///
/// Fractions are truncated toward zero, NaN becomes 0, and anything outside
/// +/-MAX_SPEED saturates at the bound.
pub fn clamp_speed(speed: f32) -> i16 {
    // `as` saturates on overflow and maps NaN to 0
    let whole = speed.trunc() as i32;
    whole.clamp(-(MAX_SPEED as i32), MAX_SPEED as i32) as i16
}

/// One command frame, ready to be written to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    direction: DirectionCode,
    register: u8,
    payload: Vec<u8>,
}

impl CommandFrame {
    /// Speed command for a channel. The speed is clamped before encoding.
    pub fn speed(channel: Channel, speed: f32) -> Self {
        let (address, direction) = channel.target();
        Self {
            direction,
            register: address as u8,
            payload: clamp_speed(speed).to_le_bytes().to_vec(),
        }
    }

    /// Zero the proportional gain for one direction channel
    pub fn zero_gain(direction: DirectionCode) -> Self {
        Self {
            direction,
            register: GAIN_REGISTER,
            payload: vec![0; 4],
        }
    }

    /// Frames that must be sent once before any speed command
    pub fn init_sequence() -> [CommandFrame; 2] {
        [
            Self::zero_gain(DirectionCode::Backward),
            Self::zero_gain(DirectionCode::Forward),
        ]
    }

    pub fn direction(&self) -> DirectionCode {
        self.direction
    }

    pub fn register(&self) -> u8 {
        self.register
    }

    /// Motor address, if this frame targets a speed register
    pub fn address(&self) -> Option<MotorAddress> {
        MotorAddress::from_register(self.register)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decode a two-byte payload back into the signed speed
    pub fn speed_value(&self) -> Option<i16> {
        match self.payload[..] {
            [lo, hi] => Some(i16::from_le_bytes([lo, hi])),
            _ => None,
        }
    }

    /// Wire bytes for this frame
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Parse a frame as produced by `Display`, terminator included
    pub fn parse(frame: &str) -> Result<Self> {
        let malformed = |reason: &str| RoverError::MalformedFrame {
            frame: frame.to_string(),
            reason: reason.to_string(),
        };

        let body = frame
            .strip_prefix(WRITE_PREFIX)
            .ok_or_else(|| malformed("missing 'w' prefix"))?
            .strip_suffix(TERMINATOR)
            .ok_or_else(|| malformed("missing newline terminator"))?;

        let mut fields = body.split(' ');
        let (Some(direction), Some(register), Some(payload), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed("expected three space-separated fields"));
        };

        if !is_code_field(direction) || !is_code_field(register) {
            return Err(malformed("direction and register must be two uppercase hex digits"));
        }
        let direction = u8::from_str_radix(direction, 16)
            .ok()
            .and_then(DirectionCode::from_code)
            .ok_or_else(|| malformed("unknown direction code"))?;
        let register =
            u8::from_str_radix(register, 16).map_err(|_| malformed("register is not hex"))?;

        if payload.is_empty() || payload.len() % 2 != 0 {
            return Err(malformed("payload must be whole hex bytes"));
        }
        if !payload.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(malformed("payload must be lowercase hex"));
        }
        let payload = (0..payload.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&payload[i..i + 2], 16).ok())
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| malformed("payload is not hex"))?;

        Ok(Self {
            direction,
            register,
            payload,
        })
    }
}

/// Direction and register fields are exactly two uppercase hex digits
fn is_code_field(field: &str) -> bool {
    field.len() == 2
        && field
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02X} {:02X} ",
            WRITE_PREFIX, self.direction as u8, self.register
        )?;
        for byte in &self.payload {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "{}", TERMINATOR)
    }
}

/// Byte sink the driver writes frames into
pub trait Transport {
    fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()>;
}

/// Serial link to the motor controller
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the controller's serial port
    pub fn open(port_name: &str, baudrate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(port_name, baudrate)
            .timeout(timeout)
            .open()
            .map_err(|source| RoverError::DeviceAbsent {
                port: port_name.to_string(),
                source,
            })?;

        debug!("Opened {} at {} baud", port_name, baudrate);
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()
    }
}
