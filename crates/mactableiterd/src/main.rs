//! mactableiterd - MAC Table Iterator Agent
//!
//! Entry point for the mactableiterd daemon. The management plane is
//! simulated in memory and driven by line commands on stdin.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eos_sdk_common::{event_channel, AgentEvent, EventLoop, InMemoryAgentMgr, InMemoryMacTable};
use mactableiterd::{AgentConfig, Controller, CursorBridgeMode, MacTableAgent, OPTION_NAME};

/// Time given to the stdin reader to finish once the agent has stopped
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// mactableiterd - MAC table iterator agent
#[derive(Parser, Debug)]
#[command(name = "mactableiterd")]
#[command(about = "EOS MAC table iterator agent", long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Cursor bridge (inline, threaded); overrides the configuration file
    #[arg(long)]
    cursor_bridge: Option<CursorBridgeMode>,

    /// Pre-configured value of the `name` option
    #[arg(short = 'n', long)]
    name: Option<String>,
}

/// Initializes tracing/logging subsystem
fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{}'", level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to set tracing subscriber")
}

fn load_config(args: &Args) -> anyhow::Result<AgentConfig> {
    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AgentConfig::default(),
    };
    if let Some(mode) = args.cursor_bridge {
        config.cursor_bridge = mode;
    }
    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    info!(?config, "Configuration loaded");

    let (events, receiver) = event_channel();
    let agent_mgr = Arc::new(InMemoryAgentMgr::new());
    if let Some(name) = &args.name {
        agent_mgr.set_option(OPTION_NAME, name.as_str());
    }
    let mac_table = Arc::new(InMemoryMacTable::with_notifier(events.clone()));

    let mut agent = MacTableAgent::new(agent_mgr.clone(), mac_table.clone(), config)?;
    let mut event_loop = EventLoop::new(receiver, agent_mgr.shutdown_token());

    events
        .send(AgentEvent::Initialized)
        .context("event queue closed before start")?;

    let stop = CancellationToken::new();
    let controller = Controller::new(events, agent_mgr, mac_table, stop.clone());
    tokio::task::spawn_blocking(move || controller.run(std::io::stdin().lock()));

    tokio::select! {
        result = event_loop.run(&mut agent) => result?,
        _ = stop.cancelled() => {
            info!("Controller input closed");
            // Commands read just before the end of input are still queued
            event_loop.drain(&mut agent)?;
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    let stats = event_loop.stats();
    info!(
        state = %agent.state(),
        dispatched = stats.dispatched,
        failed = stats.failed,
        observed = agent.observed_events(),
        "Agent stopped"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("mactableiterd: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!("--- Starting mactableiterd ---");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to build tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(args));
    // The stdin reader may be parked in a blocking read
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("mactableiterd failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
