// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::motor::{MotionIntent, WheelSpeeds};

// Command from teleop/scripts -> runtime
// Tagged by "cmd", e.g. {"cmd":"strafe_left","speed":300}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BaseCommand {
    Forward { speed: f32 },
    Backward { speed: f32 },
    RotateLeft { speed: f32 },
    RotateRight { speed: f32 },
    StrafeLeft { speed: f32 },
    StrafeRight { speed: f32 },
    Stop,
    SetMotors { fl: f32, fr: f32, rl: f32, rr: f32 },
}

impl From<&BaseCommand> for MotionIntent {
    fn from(cmd: &BaseCommand) -> Self {
        match *cmd {
            BaseCommand::Forward { speed } => MotionIntent::Forward(speed),
            BaseCommand::Backward { speed } => MotionIntent::Backward(speed),
            BaseCommand::RotateLeft { speed } => MotionIntent::RotateLeft(speed),
            BaseCommand::RotateRight { speed } => MotionIntent::RotateRight(speed),
            BaseCommand::StrafeLeft { speed } => MotionIntent::StrafeLeft(speed),
            BaseCommand::StrafeRight { speed } => MotionIntent::StrafeRight(speed),
            BaseCommand::Stop => MotionIntent::Stop,
            BaseCommand::SetMotors { fl, fr, rl, rr } => {
                MotionIntent::Wheels(WheelSpeeds::new(fl, fr, rl, rr))
            }
        }
    }
}

// Actuation output from runtime -> observers
// The wheel speeds most recently sent to the controller, before clamping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct BaseActuation {
    pub wheels: WheelSpeeds,
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
    /// Motor controller not connected; commands are dropped
    DeviceAbsent,
    /// Last command failed to reach the controller
    WriteFault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cmd: BaseCommand =
            serde_json::from_str(r#"{"cmd":"strafe_left","speed":300}"#).unwrap();
        assert_eq!(cmd, BaseCommand::StrafeLeft { speed: 300.0 });
        assert_eq!(MotionIntent::from(&cmd), MotionIntent::StrafeLeft(300.0));

        let cmd: BaseCommand = serde_json::from_str(r#"{"cmd":"stop"}"#).unwrap();
        assert_eq!(MotionIntent::from(&cmd), MotionIntent::Stop);

        let cmd: BaseCommand =
            serde_json::from_str(r#"{"cmd":"set_motors","fl":100,"fr":-100,"rl":50,"rr":-50}"#)
                .unwrap();
        assert_eq!(
            MotionIntent::from(&cmd),
            MotionIntent::Wheels(WheelSpeeds::new(100.0, -100.0, 50.0, -50.0))
        );
    }

    #[test]
    fn test_reject_unknown_command() {
        assert!(serde_json::from_str::<BaseCommand>(r#"{"cmd":"jump","speed":1}"#).is_err());
        assert!(serde_json::from_str::<BaseCommand>(r#"{"cmd":"forward"}"#).is_err());
    }

    #[test]
    fn test_health_serialization() {
        assert_eq!(
            serde_json::to_string(&RuntimeHealth::CmdStale).unwrap(),
            r#""cmd_stale""#
        );
        assert_eq!(
            serde_json::to_string(&RuntimeHealth::DeviceAbsent).unwrap(),
            r#""device_absent""#
        );
    }
}
