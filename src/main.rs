//! alb-lifecycle
//!
//! Joins this instance to a load balancer target group and leaves it again on
//! termination, so deploys and scale-in drain cleanly.
//!
//! # Flow
//!
//! ```text
//!   metadata ──▶ identity ──▶ [health gate] ──▶ register ──▶ wait for signal ──▶ deregister
//!                                  │                │
//!                                  ▼                ▼
//!                             exit 1 if not    compensating
//!                             healthy in time  deregister on error
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use alb_lifecycle::config::loader::{finalize_config, load_config};
use alb_lifecycle::config::{LifecycleConfig, LogFormat};
use alb_lifecycle::control_plane::{ControlPlane, Elbv2ControlPlane};
use alb_lifecycle::health::HealthPoller;
use alb_lifecycle::lifecycle::signals::spawn_signal_listener;
use alb_lifecycle::metadata::{ImdsMetadata, InstanceMetadata, StaticMetadata};
use alb_lifecycle::observability::init_logging;
use alb_lifecycle::{LifecycleController, LifecycleError, LifecycleResult, Shutdown};

const EXIT_UNHEALTHY: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "alb-lifecycle")]
#[command(about = "Register this instance with a target group and deregister it on shutdown", long_about = None)]
struct Cli {
    /// ARN of the target group.
    #[arg(long)]
    arn: Option<String>,

    /// Port to register with the target group.
    #[arg(long)]
    port: Option<u16>,

    /// Seconds to wait for the service to become healthy.
    #[arg(long = "max-wait", value_name = "SECS")]
    max_wait: Option<u64>,

    /// Check local health before registering.
    #[arg(long)]
    check_health: bool,

    /// Register and exit without waiting for a termination signal.
    #[arg(long, conflicts_with = "deregister_only")]
    register_only: bool,

    /// Deregister and exit.
    #[arg(long, conflicts_with = "check_health")]
    deregister_only: bool,

    /// Optional TOML configuration file. Flags override its values.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// AWS region override.
    #[arg(long)]
    region: Option<String>,

    /// Log level.
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format.
    #[arg(long, value_parser = ["pretty", "json"])]
    log_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lifecycle,
    RegisterOnly,
    DeregisterOnly,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.deregister_only {
            Mode::DeregisterOnly
        } else if self.register_only {
            Mode::RegisterOnly
        } else {
            Mode::Lifecycle
        }
    }

    /// Layer command-line flags over the file (or default) configuration.
    fn apply(&self, mut config: LifecycleConfig) -> LifecycleConfig {
        if let Some(arn) = &self.arn {
            config.target_group.arn = arn.clone();
        }
        if let Some(port) = self.port {
            config.target_group.port = port;
        }
        if let Some(max_wait) = self.max_wait {
            config.health.max_wait_secs = max_wait;
        }
        if self.check_health {
            config.health.check_before_register = true;
        }
        if let Some(region) = &self.region {
            config.aws.region = Some(region.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        match self.log_format.as_deref() {
            Some("json") => config.logging.format = LogFormat::Json,
            Some("pretty") => config.logging.format = LogFormat::Pretty,
            _ => {}
        }
        config
    }

    fn resolve_config(&self) -> LifecycleResult<LifecycleConfig> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => LifecycleConfig::default(),
        };
        Ok(finalize_config(self.apply(base))?)
    }
}

/// How a run that did not error ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Unhealthy,
}

fn exit_status(result: &LifecycleResult<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Success) => 0,
        Ok(Outcome::Unhealthy) => EXIT_UNHEALTHY,
        Err(_) => EXIT_ERROR,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("alb-lifecycle: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    init_logging(&config.logging);

    let result = match connect(&config).await {
        Ok((metadata, control_plane)) => run(cli.mode(), &config, metadata.as_ref(), control_plane).await,
        Err(e) => Err(e),
    };
    if let Err(e) = &result {
        tracing::error!(error = %e, "Aborting");
    }
    ExitCode::from(exit_status(&result))
}

/// Build the AWS-backed metadata source and control plane.
async fn connect(config: &LifecycleConfig) -> LifecycleResult<(Box<dyn InstanceMetadata>, Arc<dyn ControlPlane>)> {
    let metadata: Box<dyn InstanceMetadata> = match (&config.metadata.instance_id, &config.metadata.local_address) {
        (Some(id), Some(addr)) => Box::new(StaticMetadata::new(id.clone(), addr.clone())),
        _ => Box::new(ImdsMetadata::from_config(&config.metadata)?),
    };
    let control_plane: Arc<dyn ControlPlane> = Arc::new(Elbv2ControlPlane::from_config(&config.aws).await);
    Ok((metadata, control_plane))
}

async fn run(
    mode: Mode,
    config: &LifecycleConfig,
    metadata: &dyn InstanceMetadata,
    control_plane: Arc<dyn ControlPlane>,
) -> LifecycleResult<Outcome> {
    let poller = HealthPoller::new(Duration::from_secs(config.health.request_timeout_secs))?;

    let mut controller = LifecycleController::new(
        config.target_group.arn.clone(),
        config.target_group.port,
        metadata,
        control_plane,
        poller,
    )
    .await?;
    let instance_id = controller.identity().instance_id.clone();
    let port = controller.identity().port;

    if mode == Mode::DeregisterOnly {
        controller.deregister().await?;
        println!("Instance {} draining", instance_id);
        return Ok(Outcome::Success);
    }

    if config.health.check_before_register {
        let max_wait = Duration::from_secs(config.health.max_wait_secs);
        if controller.check_health(max_wait).await? {
            println!("Instance {} healthy on port {}", instance_id, port);
        } else {
            println!("Instance {} unhealthy on port {}", instance_id, port);
            return Ok(Outcome::Unhealthy);
        }
    }

    if mode == Mode::RegisterOnly {
        controller.register_or_compensate().await?;
        println!("Instance {} registered on port {}", instance_id, port);
        return Ok(Outcome::Success);
    }

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    spawn_signal_listener(shutdown).map_err(LifecycleError::Signal)?;

    controller.run_until_shutdown(receiver).await?;
    println!("Instance {} draining", instance_id);
    Ok(Outcome::Success)
}
