use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mecanum_rover_runtime::config::RoverConfig;
use mecanum_rover_runtime::motor::MotorDriver;

#[derive(Debug, Parser)]
#[command(about = "Mecanum rover motor runtime")]
struct Args {
    /// JSON config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port, overrides the config file
    #[arg(short, long)]
    port: Option<String>,

    /// Run without opening the serial port
    #[arg(long)]
    no_motors: bool,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    if let Err(e) = start(args).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}

async fn start(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = match &args.config {
        Some(path) => RoverConfig::load(path)?,
        None => RoverConfig::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    let driver = if args.no_motors {
        MotorDriver::disabled(&config)?
    } else {
        MotorDriver::open(&config)?
    };

    mecanum_rover_runtime::runtime::run(driver).await
}
