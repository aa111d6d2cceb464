// Motor test: step-by-step bench test of every maneuver
//
// IMPORTANT: Run frame_dump FIRST to check the frames that will be sent.
//
// Usage: cargo run --example motor_test -- [port]
// Example: cargo run --example motor_test -- /dev/ttyUSB_Rover
//
// Safety features:
// - Explicit confirmation before any writes
// - Starts with zero speed
// - Slow test speeds
// - Easy abort with Ctrl+C

use mecanum_rover_runtime::config::RoverConfig;
use mecanum_rover_runtime::motor::{MotionIntent, MotorDriver};
use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().eq_ignore_ascii_case("y")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("debug".parse().unwrap()),
        )
        .init();

    let mut config = RoverConfig::default();
    if let Some(port) = std::env::args().nth(1) {
        config.port = port;
    }

    println!("Mecanum rover motor test (WITH WRITES)");
    println!("This tool WILL write to motors and cause movement!");
    println!("Make sure wheels are OFF THE GROUND before proceeding!");
    println!();
    println!("Serial port: {}", config.port);
    println!();

    if !confirm("Are the robot's wheels OFF THE GROUND (robot elevated/on blocks)?") {
        println!("Please elevate the robot so wheels can spin freely without moving the robot.");
        return Ok(());
    }

    // ========== STEP 1: Open and initialize ==========
    println!("Step 1: Opening serial port and zeroing speed gain...");
    let mut driver = MotorDriver::open(&config)?;
    if !driver.is_active() {
        println!("  ✗ Motor controller not found on {} - aborting", config.port);
        return Ok(());
    }
    println!("  ✓ Connected and initialized");
    println!();

    // ========== STEP 2: Zero speed ==========
    println!("Step 2: Sending ZERO speed to all motors...");
    println!("  This should NOT cause any movement.");
    driver.stop()?;
    println!("  ✓ Zero speed sent");
    println!();

    // ========== STEP 3: Slow motion test ==========
    let test_speed = 150.0;
    let test_duration = Duration::from_millis(500);
    let pause_duration = Duration::from_millis(500);

    println!("Step 3: Slow motion test");
    println!("  Speed: {} (device units, max 1300)", test_speed);
    println!("  ⚠  Press Ctrl+C at any time to abort!");
    println!();

    if !confirm("Proceed with motion test?") {
        driver.stop()?;
        return Ok(());
    }

    let tests = [
        ("Forward", MotionIntent::Forward(test_speed)),
        ("Backward", MotionIntent::Backward(test_speed)),
        ("Rotate left", MotionIntent::RotateLeft(test_speed)),
        ("Rotate right", MotionIntent::RotateRight(test_speed)),
        ("Strafe left", MotionIntent::StrafeLeft(test_speed)),
        ("Strafe right", MotionIntent::StrafeRight(test_speed)),
    ];

    for (name, intent) in tests {
        println!("  Testing: {}...", name);
        let wheels = driver.apply(intent)?;
        println!(
            "    Wheel commands: fl={}, fr={}, rl={}, rr={}",
            wheels.front_left, wheels.front_right, wheels.rear_left, wheels.rear_right
        );
        sleep(test_duration);

        driver.stop()?;
        sleep(pause_duration);
    }

    println!();
    println!("Step 4: Stopping motors...");
    driver.stop()?;
    println!("  ✓ Motors stopped");
    println!();
    println!("If the wheels moved as expected, the motor control is working correctly.");
    println!("You can now try the full runtime with: cargo run");

    Ok(())
}
