// 50 Hz command loop
// Each received command is sent to the motors once; speed commands are not replayed.
// Health goes stale when no command arrives within CMD_TIMEOUT.

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{info, warn};

use crate::config::{CMD_TIMEOUT, LOOP_HZ, TOPIC_CMD_BASE, TOPIC_HEALTH, TOPIC_RT_BASE};
use crate::messages::{BaseActuation, BaseCommand, RuntimeHealth};
use crate::motor::{MotionIntent, MotorDriver};

pub struct Runtime {
    driver: MotorDriver,
    pending_cmd: Option<BaseCommand>,
    cmd_received_at: Option<Instant>,
    actuation: BaseActuation,
    write_fault: bool,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(driver: MotorDriver) -> Self {
        Self {
            driver,
            pending_cmd: None,
            cmd_received_at: None,
            actuation: BaseActuation::default(),
            write_fault: false,
            health: RuntimeHealth::CmdStale, // Start stale until first cmd
        }
    }

    /// Process incoming command; only the latest one per tick is sent
    pub fn on_command(&mut self, cmd: BaseCommand) {
        info!("Received command: {:?}", &cmd);
        self.pending_cmd = Some(cmd);
        self.cmd_received_at = Some(Instant::now());
    }

    /// Send the pending command, if any, and update health
    pub fn step(&mut self) -> RuntimeHealth {
        if let Some(cmd) = self.pending_cmd.take() {
            match self.driver.apply(MotionIntent::from(&cmd)) {
                Ok(wheels) => {
                    self.actuation = BaseActuation { wheels };
                    self.write_fault = false;
                }
                Err(e) => {
                    warn!("Failed to send {:?}: {}", cmd, e);
                    self.write_fault = true;
                }
            }
        }

        self.health = self.compute_health();
        self.health
    }

    fn compute_health(&self) -> RuntimeHealth {
        if !self.driver.is_active() {
            return RuntimeHealth::DeviceAbsent;
        }
        if self.write_fault {
            return RuntimeHealth::WriteFault;
        }
        match self.cmd_received_at {
            Some(at) if at.elapsed() <= CMD_TIMEOUT => RuntimeHealth::Ok,
            _ => {
                if self.health == RuntimeHealth::Ok {
                    warn!("No command for {:?}", CMD_TIMEOUT);
                }
                RuntimeHealth::CmdStale
            }
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn actuation(&self) -> BaseActuation {
        self.actuation
    }
}

pub async fn run(driver: MotorDriver) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let subscriber = session.declare_subscriber(TOPIC_CMD_BASE).await?;
    let pub_actuation = session.declare_publisher(TOPIC_RT_BASE).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    let mut runtime = Runtime::new(driver);
    let mut tick = interval(Duration::from_millis(1000 / LOOP_HZ));

    info!(
        "Runtime started: {}Hz loop, health stale after {}ms, motors {}",
        LOOP_HZ,
        CMD_TIMEOUT.as_millis(),
        if runtime.driver.is_active() { "active" } else { "disabled" }
    );
    info!("Subscribed to: {}", TOPIC_CMD_BASE);
    info!("Publishing to: {}, {}", TOPIC_RT_BASE, TOPIC_HEALTH);

    loop {
        tick.tick().await;

        // 1. Drain all pending commands (non-blocking), keep latest
        while let Ok(Some(sample)) = subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<BaseCommand>(&payload) {
                Ok(cmd) => {
                    runtime.on_command(cmd);
                }
                Err(e) => {
                    warn!("Failed to parse command: {}", e);
                }
            }
        }

        // 2. Send to motors
        let health = runtime.step();

        // 3. Publish actuation
        let actuation_json = serde_json::to_string(&runtime.actuation())?;
        pub_actuation.put(actuation_json).await?;

        // 4. Publish health
        let health_json = serde_json::to_string(&health)?;
        pub_health.put(health_json).await?;
    }
}
