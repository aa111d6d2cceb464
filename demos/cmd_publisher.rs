// Keyboard teleop: W/S drive, A/D strafe, Z/X rotate, R/F speed, Q quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use mecanum_rover_runtime::config::TOPIC_CMD_BASE;
use mecanum_rover_runtime::messages::BaseCommand;
use std::time::{Duration, Instant};
use tracing::info;

const SPEEDS: [f32; 3] = [200.0, 600.0, 1200.0]; // device units
const INPUT_TIMEOUT_MS: u64 = 100; // Stop after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_BASE).await?;

    info!("Controls: W/S=drive, A/D=strafe, Z/X=rotate, R/F=speed, Q=quit");
    info!("Speed: LOW");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut speed_idx: usize = 0;

    let mut cmd = BaseCommand::Stop;
    let mut last_movement_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                let speed = SPEEDS[speed_idx];

                let movement = match code {
                    KeyCode::Char('w') if pressed => Some(BaseCommand::Forward { speed }),
                    KeyCode::Char('s') if pressed => Some(BaseCommand::Backward { speed }),
                    KeyCode::Char('a') if pressed => Some(BaseCommand::StrafeLeft { speed }),
                    KeyCode::Char('d') if pressed => Some(BaseCommand::StrafeRight { speed }),
                    KeyCode::Char('z') if pressed => Some(BaseCommand::RotateLeft { speed }),
                    KeyCode::Char('x') if pressed => Some(BaseCommand::RotateRight { speed }),

                    // Speed control
                    KeyCode::Char('r') if pressed => {
                        speed_idx = (speed_idx + 1).min(2);
                        print_speed(speed_idx);
                        None
                    }
                    KeyCode::Char('f') if pressed => {
                        speed_idx = speed_idx.saturating_sub(1);
                        print_speed(speed_idx);
                        None
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => None,
                };

                if let Some(movement) = movement {
                    cmd = movement;
                    last_movement_input = Instant::now();
                }
            }
        }

        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            cmd = BaseCommand::Stop;
        }

        // Always publish at ~50Hz
        publisher.put(serde_json::to_string(&cmd)?).await?;
    }

    publisher
        .put(serde_json::to_string(&BaseCommand::Stop)?)
        .await?;
    Ok(())
}

fn print_speed(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Speed: {} ({})", label, SPEEDS[idx]);
}
