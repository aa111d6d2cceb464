// Motor control module for the mecanum rover base
//
// Provides:
// - Mecanum kinematics (motion intent -> wheel speeds)
// - Motor controller ASCII frame protocol and serial transport
// - High-level motor driver API

mod driver;
pub mod kinematics;
pub mod protocol;

pub use driver::{DriverStatus, MotorDriver};
pub use kinematics::{intent_to_wheels, MotionIntent, WheelSpeeds};
pub use protocol::{
    Channel, CommandFrame, DirectionCode, MotorAddress, RoverError, SerialTransport, Transport,
    WheelPosition,
};
