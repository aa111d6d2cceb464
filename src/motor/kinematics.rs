// Mecanum drive kinematics for the four-wheel rover
// Maps a named maneuver and a scalar speed to one value per wheel.

use serde::{Deserialize, Serialize};
use std::ops::Neg;

use super::protocol::WheelPosition;

/// Speed for each of the four wheels, in device units.
///
/// Values are not clamped here; the protocol encoder does that per wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelSpeeds {
    pub front_left: f32,
    pub front_right: f32,
    pub rear_left: f32,
    pub rear_right: f32,
}

impl WheelSpeeds {
    pub fn new(front_left: f32, front_right: f32, rear_left: f32, rear_right: f32) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns speeds as array [front_left, front_right, rear_left, rear_right]
    pub fn as_array(&self) -> [f32; 4] {
        [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ]
    }

    pub fn get(&self, position: WheelPosition) -> f32 {
        match position {
            WheelPosition::FrontLeft => self.front_left,
            WheelPosition::FrontRight => self.front_right,
            WheelPosition::RearLeft => self.rear_left,
            WheelPosition::RearRight => self.rear_right,
        }
    }
}

impl Neg for WheelSpeeds {
    type Output = WheelSpeeds;

    fn neg(self) -> Self::Output {
        WheelSpeeds::new(
            -self.front_left,
            -self.front_right,
            -self.rear_left,
            -self.rear_right,
        )
    }
}

/// High-level motion request for the base
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionIntent {
    Forward(f32),
    Backward(f32),
    /// Spin counter-clockwise in place
    RotateLeft(f32),
    /// Spin clockwise in place
    RotateRight(f32),
    /// Translate sideways to the left without turning
    StrafeLeft(f32),
    /// Translate sideways to the right without turning
    StrafeRight(f32),
    Stop,
    /// Explicit per-wheel speeds, passed through unchanged
    Wheels(WheelSpeeds),
}

/// Convert a motion intent to wheel speeds
///
/// Sign convention, for speed `s` as (FL, FR, RL, RR):
/// * forward: ( s,  s,  s,  s)
/// * rotate left: (-s,  s, -s,  s)
/// * strafe left: (-s,  s,  s, -s)
///
/// Backward, rotate right and strafe right are the negations.
pub fn intent_to_wheels(intent: MotionIntent) -> WheelSpeeds {
    match intent {
        MotionIntent::Forward(s) => WheelSpeeds::new(s, s, s, s),
        MotionIntent::Backward(s) => WheelSpeeds::new(-s, -s, -s, -s),
        MotionIntent::RotateLeft(s) => WheelSpeeds::new(-s, s, -s, s),
        MotionIntent::RotateRight(s) => WheelSpeeds::new(s, -s, s, -s),
        MotionIntent::StrafeLeft(s) => WheelSpeeds::new(-s, s, s, -s),
        MotionIntent::StrafeRight(s) => WheelSpeeds::new(s, -s, -s, s),
        MotionIntent::Stop => WheelSpeeds::zero(),
        MotionIntent::Wheels(speeds) => speeds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEEDS: [f32; 6] = [0.0, 1.0, -1.0, 250.0, 2500.0, 0.75];

    #[test]
    fn test_stop() {
        assert_eq!(intent_to_wheels(MotionIntent::Stop).as_array(), [0.0; 4]);
    }

    #[test]
    fn test_forward_and_backward() {
        for s in SPEEDS {
            assert_eq!(
                intent_to_wheels(MotionIntent::Forward(s)).as_array(),
                [s, s, s, s]
            );
            assert_eq!(
                intent_to_wheels(MotionIntent::Backward(s)).as_array(),
                [-s, -s, -s, -s]
            );
        }
    }

    #[test]
    fn test_rotation_table() {
        let left = intent_to_wheels(MotionIntent::RotateLeft(300.0));
        assert_eq!(left.as_array(), [-300.0, 300.0, -300.0, 300.0]);

        let right = intent_to_wheels(MotionIntent::RotateRight(300.0));
        assert_eq!(right.as_array(), [300.0, -300.0, 300.0, -300.0]);
    }

    #[test]
    fn test_strafe_table() {
        let left = intent_to_wheels(MotionIntent::StrafeLeft(300.0));
        assert_eq!(left.as_array(), [-300.0, 300.0, 300.0, -300.0]);

        let right = intent_to_wheels(MotionIntent::StrafeRight(300.0));
        assert_eq!(right.as_array(), [300.0, -300.0, -300.0, 300.0]);
    }

    #[test]
    fn test_left_right_are_negations() {
        for s in SPEEDS {
            assert_eq!(
                intent_to_wheels(MotionIntent::RotateLeft(s)),
                -intent_to_wheels(MotionIntent::RotateRight(s))
            );
            assert_eq!(
                intent_to_wheels(MotionIntent::StrafeLeft(s)),
                -intent_to_wheels(MotionIntent::StrafeRight(s))
            );
        }
    }

    #[test]
    fn test_explicit_wheels_unclamped() {
        let speeds = WheelSpeeds::new(5000.0, -100.0, 50.5, -5000.0);
        let mapped = intent_to_wheels(MotionIntent::Wheels(speeds));
        assert_eq!(mapped, speeds);
        assert_eq!(mapped.get(WheelPosition::FrontLeft), 5000.0);
        assert_eq!(mapped.get(WheelPosition::RearRight), -5000.0);
    }
}
