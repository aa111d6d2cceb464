// High-level motor driver for the mecanum rover
//
// Combines kinematics and the controller protocol to provide a simple API
// for driving the four-wheel base.

use tracing::{debug, info, warn};

use super::kinematics::{intent_to_wheels, MotionIntent, WheelSpeeds};
use super::protocol::{
    Channel, CommandFrame, Result, RoverError, SerialTransport, Transport, WheelPosition,
};
use crate::config::RoverConfig;

/// Whether the driver is connected to hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    Active,
    /// No device; motion commands are accepted and dropped
    Disabled,
}

/// One wheel's wiring: controller channel and speed scale
#[derive(Debug, Clone, Copy)]
struct WheelMotor {
    position: WheelPosition,
    channel: Channel,
    alpha: f32,
}

/// High-level motor driver for the mecanum rover base
pub struct MotorDriver {
    transport: Option<Box<dyn Transport + Send>>,
    wheels: [WheelMotor; 4], // [front_left, front_right, rear_left, rear_right]
}

impl MotorDriver {
    /// Open the serial port from the config and initialize the controller.
    ///
    /// A missing device is not an error: the driver comes up disabled and
    /// `is_active()` returns false. Bad channel assignments are.
    pub fn open(config: &RoverConfig) -> Result<Self> {
        let wheels = wheel_motors(config)?;

        info!("Opening motor controller on {}", config.port);
        match SerialTransport::open(&config.port, config.baud_rate, config.timeout()) {
            Ok(transport) => Self::start(Box::new(transport), wheels),
            Err(e @ RoverError::DeviceAbsent { .. }) => {
                warn!("{}; motor commands will be ignored", e);
                Ok(Self {
                    transport: None,
                    wheels,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Create with a caller-supplied transport
    pub fn with_transport<T>(config: &RoverConfig, transport: T) -> Result<Self>
    where
        T: Transport + Send + 'static,
    {
        let wheels = wheel_motors(config)?;
        Self::start(Box::new(transport), wheels)
    }

    /// Create a driver with no hardware attached
    pub fn disabled(config: &RoverConfig) -> Result<Self> {
        let wheels = wheel_motors(config)?;
        info!("Motor driver running without hardware");
        Ok(Self {
            transport: None,
            wheels,
        })
    }

    fn start(transport: Box<dyn Transport + Send>, wheels: [WheelMotor; 4]) -> Result<Self> {
        let mut driver = Self {
            transport: Some(transport),
            wheels,
        };
        driver.initialize()?;
        Ok(driver)
    }

    /// Zero the speed gain on both direction channels.
    ///
    /// The controller ignores serial speed commands until this is done.
    fn initialize(&mut self) -> Result<()> {
        info!("Zeroing speed gain on motor controller");
        for frame in CommandFrame::init_sequence() {
            self.send(None, &frame)?;
        }
        info!("Motor controller initialized");
        Ok(())
    }

    fn send(&mut self, wheel: Option<WheelPosition>, frame: &CommandFrame) -> Result<()> {
        let Some(transport) = self.transport.as_mut() else {
            return Ok(());
        };

        debug!("Sending {:?}", frame.to_string());
        transport
            .write_frame(&frame.to_bytes())
            .map_err(|source| RoverError::TransportWrite { wheel, source })
    }

    pub fn status(&self) -> DriverStatus {
        if self.transport.is_some() {
            DriverStatus::Active
        } else {
            DriverStatus::Disabled
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == DriverStatus::Active
    }

    /// Send one frame per wheel, front-left to rear-right.
    ///
    /// Stops at the first failed write; frames already sent stay in effect.
    pub fn set_wheel_speeds(&mut self, speeds: WheelSpeeds) -> Result<WheelSpeeds> {
        debug!(
            "Setting wheel speeds: fl={}, fr={}, rl={}, rr={}",
            speeds.front_left, speeds.front_right, speeds.rear_left, speeds.rear_right
        );

        for wheel in self.wheels {
            let speed = speeds.get(wheel.position) * wheel.alpha;
            let frame = CommandFrame::speed(wheel.channel, speed);
            self.send(Some(wheel.position), &frame)?;
        }
        Ok(speeds)
    }

    /// Map a motion intent to wheel speeds and send them
    pub fn apply(&mut self, intent: MotionIntent) -> Result<WheelSpeeds> {
        self.set_wheel_speeds(intent_to_wheels(intent))
    }

    pub fn set_motors(
        &mut self,
        front_left: f32,
        front_right: f32,
        rear_left: f32,
        rear_right: f32,
    ) -> Result<WheelSpeeds> {
        self.apply(MotionIntent::Wheels(WheelSpeeds::new(
            front_left,
            front_right,
            rear_left,
            rear_right,
        )))
    }

    pub fn forward(&mut self, speed: f32) -> Result<WheelSpeeds> {
        self.apply(MotionIntent::Forward(speed))
    }

    pub fn backward(&mut self, speed: f32) -> Result<WheelSpeeds> {
        self.apply(MotionIntent::Backward(speed))
    }

    pub fn rotate_left(&mut self, speed: f32) -> Result<WheelSpeeds> {
        self.apply(MotionIntent::RotateLeft(speed))
    }

    pub fn rotate_right(&mut self, speed: f32) -> Result<WheelSpeeds> {
        self.apply(MotionIntent::RotateRight(speed))
    }

    pub fn strafe_left(&mut self, speed: f32) -> Result<WheelSpeeds> {
        self.apply(MotionIntent::StrafeLeft(speed))
    }

    pub fn strafe_right(&mut self, speed: f32) -> Result<WheelSpeeds> {
        self.apply(MotionIntent::StrafeRight(speed))
    }

    /// Command zero speed on all wheels
    pub fn stop(&mut self) -> Result<WheelSpeeds> {
        info!("Stopping all motors");
        self.apply(MotionIntent::Stop)
    }

    /// Controller channel for a wheel
    pub fn channel(&self, position: WheelPosition) -> Channel {
        self.wheels
            .iter()
            .find(|w| w.position == position)
            .map(|w| w.channel)
            .unwrap_or_else(|| position.default_channel())
    }
}

fn wheel_motors(config: &RoverConfig) -> Result<[WheelMotor; 4]> {
    let channels = config.channels()?;
    Ok(std::array::from_fn(|i| {
        let position = WheelPosition::ALL[i];
        WheelMotor {
            position,
            channel: channels[i],
            alpha: config.wheels.get(position).alpha,
        }
    }))
}
