//! Net Agent - Host Health Sampler Binary
//!
//! Samples reachability, CPU and memory on a fixed interval and stores each
//! sample in MongoDB.

use clap::{Args, Parser, Subcommand};
use net_agent::{
    redact_uri, ticker, Agent, AgentConfig, AgentError, HealthSample, LinkStatus, MongoSink,
    Prober, ProbeTarget, ResourceSampler, StoreConfig, SystemSampler, TcpProber,
    DEFAULT_COLLECTION, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE, DEFAULT_INTERVAL_SECS,
    DEFAULT_NODE_ID, DEFAULT_PROBE_HOST, DEFAULT_PROBE_PORT, DEFAULT_PROBE_TIMEOUT_SECS,
};
use std::process::ExitCode;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "net_agent")]
#[command(about = "🕵️ Net Agent - System Health Monitor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Samples network reachability, CPU and memory load and stores each sample in MongoDB")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    mongo_uri: Option<String>,

    /// Database that receives samples
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,

    /// Collection that receives samples
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Seconds to sleep between samples
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Reachability probe host
    #[arg(long, default_value = DEFAULT_PROBE_HOST)]
    target_host: String,

    /// Reachability probe port
    #[arg(long, default_value_t = DEFAULT_PROBE_PORT)]
    target_port: u16,

    /// Reachability probe timeout in seconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    probe_timeout: u64,

    /// Seconds to wait for the store at startup
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout: u64,

    /// Identifier written into every sample
    #[arg(long, default_value = DEFAULT_NODE_ID)]
    node_id: String,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sampling loop (default)
    Run,

    /// Probe the reachability target once and exit
    Probe,

    /// Take one sample without storing it and exit
    Sample(SampleArgs),
}

#[derive(Args)]
struct SampleArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

impl Cli {
    fn agent_config(&self) -> AgentConfig {
        AgentConfig::default()
            .with_interval(Duration::from_secs(self.interval))
            .with_probe(
                ProbeTarget::new(&self.target_host, self.target_port)
                    .with_timeout(Duration::from_secs(self.probe_timeout)),
            )
            .with_node_id(&self.node_id)
    }

    fn store_config(&self) -> net_agent::Result<StoreConfig> {
        Ok(net_agent::config::store_config_from(self.mongo_uri.as_deref())?
            .with_database(&self.database)
            .with_collection(&self.collection)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout)))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // invalid arguments are configuration errors and exit 1, not clap's 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging(&cli) {
        eprintln!("❌ Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Some(Commands::Run) | None => run_command(&cli).await.map_err(anyhow::Error::from),
        Some(Commands::Probe) => probe_command(&cli).await,
        Some(Commands::Sample(args)) => sample_command(&cli, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn print_banner(store: &StoreConfig, config: &AgentConfig) {
    println!("--------------------------------------------------");
    println!("   🕵️  NET AGENT: System Health Monitor Initialized");
    println!("--------------------------------------------------");
    println!("Target: {}", redact_uri(&store.uri));
    println!("Interval: {}s", config.interval.as_secs());
    println!("Probe: {} (timeout {}s)", config.probe.address(), config.probe.timeout.as_secs());
    println!("Node: {}", config.node_id);
    println!("--------------------------------------------------");
    println!();
}

async fn run_command(cli: &Cli) -> Result<(), AgentError> {
    let store = cli.store_config()?;
    let config = cli.agent_config();
    config.validate()?;

    let (shutdown, mut ticker) = ticker(config.interval);
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("🛑 Interrupt received, shutting down");
        shutdown.trigger();
    });

    print_banner(&store, &config);

    let sink = tokio::select! {
        sink = MongoSink::connect(&store, &config.node_id) => sink?,
        _ = ticker.cancelled() => {
            println!("\n🛑 Agent stopped by user.");
            return Ok(());
        }
    };
    info!("Writing samples to {}", sink.namespace());

    let mut agent = Agent::new(config, TcpProber::new(), SystemSampler::new(), sink);
    agent.run(&mut ticker).await;

    println!("\n🛑 Agent stopped by user.");
    Ok(())
}

async fn probe_command(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.agent_config();
    config.validate()?;

    let reach = TcpProber::new().probe(&config.probe).await;
    match reach.status() {
        LinkStatus::Online => println!(
            "🚀 {} is ONLINE ({}ms)",
            config.probe.address(),
            reach.latency_ms()
        ),
        LinkStatus::Offline => println!("⚠️ {} is OFFLINE", config.probe.address()),
    }

    Ok(())
}

async fn sample_command(cli: &Cli, args: &SampleArgs) -> anyhow::Result<()> {
    let config = cli.agent_config();
    config.validate()?;

    let mut sampler = SystemSampler::new();
    sampler.prime()?;
    let reach = TcpProber::new().probe(&config.probe).await;
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    let usage = sampler.sample()?;

    let sample = HealthSample::new(reach, usage, config.node_id.as_str());

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&sample)?),
        "pretty" => print_pretty_sample(&sample),
        other => anyhow::bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

fn print_pretty_sample(sample: &HealthSample) {
    println!("🕵️ Health Sample ({})", sample.timestamp().format("%Y-%m-%d %H:%M:%S %:z"));
    println!("==========================================");
    println!("  Node: {}", sample.node_id());
    println!("  Status: {}", sample.status());
    println!("  Latency: {}ms", sample.latency_ms());
    println!("  CPU: {}%", sample.cpu_percent());
    println!("  RAM: {}%", sample.ram_percent());
}
