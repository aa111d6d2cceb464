// Frame dump: prints the exact frames each maneuver would send. No hardware needed.
//
// Usage: cargo run --example frame_dump -- [speed]
// Example: cargo run --example frame_dump -- 250

use mecanum_rover_runtime::motor::{
    intent_to_wheels, CommandFrame, MotionIntent, WheelPosition,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let speed: f32 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 250.0,
    };

    println!("Init sequence:");
    for frame in CommandFrame::init_sequence() {
        print!("  {}", frame);
    }
    println!();

    let maneuvers = [
        ("Forward", MotionIntent::Forward(speed)),
        ("Backward", MotionIntent::Backward(speed)),
        ("Rotate left", MotionIntent::RotateLeft(speed)),
        ("Rotate right", MotionIntent::RotateRight(speed)),
        ("Strafe left", MotionIntent::StrafeLeft(speed)),
        ("Strafe right", MotionIntent::StrafeRight(speed)),
        ("Stop", MotionIntent::Stop),
    ];

    for (name, intent) in maneuvers {
        println!("{} ({}):", name, speed);
        let wheels = intent_to_wheels(intent);
        for position in WheelPosition::ALL {
            let frame = CommandFrame::speed(position.default_channel(), wheels.get(position));
            println!(
                "  {:<12} {:?} -> {}",
                position.to_string(),
                frame.speed_value().unwrap_or_default(),
                frame.to_string().trim_end()
            );
        }
    }

    Ok(())
}
