//! hostpulse - Host Telemetry Endpoint Binary
//!
//! Serves host telemetry as JSON over HTTP, or prints a single snapshot.

use anyhow::Context;
use clap::{builder::BoolishValueParser, ArgAction, Args, Parser, Subcommand};
use hostpulse::{
    config::{DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_THERMAL_ZONE},
    start_web_server, CollectorConfig, MetricsCollector, MetricsSnapshot, WebConfig,
    DEFAULT_LISTEN_PORT,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "hostpulse")]
#[command(about = "Host telemetry as JSON over HTTP")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Reports CPU, memory, disk and network telemetry of this host as one JSON document per request"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, env = "LISTEN_PORT", default_value_t = DEFAULT_LISTEN_PORT)]
    port: u16,

    /// File holding the CPU temperature in millidegrees
    #[arg(long, env = "THERMAL_ZONE", default_value = DEFAULT_THERMAL_ZONE)]
    thermal_zone: PathBuf,

    /// Report per-core clock speed from cpufreq policy nodes
    #[arg(
        long,
        env = "CPUSPEEDPOLICY",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    cpu_speed_policy: bool,

    /// Report per-core clock speed from the OS core table
    #[arg(
        long,
        env = "CPUSPEEDNODEOS",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    cpu_speed_nodeos: bool,

    /// Report root filesystem usage
    #[arg(
        long,
        env = "DRIVEINFO",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    drive_info: bool,

    /// Upper bound for each pseudo-file read in milliseconds
    #[arg(long, env = "PROBE_TIMEOUT_MS", default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
    probe_timeout_ms: u64,

    /// Send permissive CORS headers
    #[arg(
        long,
        env = "ENABLE_CORS",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    cors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve,

    /// Collect a single snapshot, print it and exit
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "json")]
    format: String,
}

impl Cli {
    fn collector_config(&self) -> CollectorConfig {
        CollectorConfig::default()
            .with_thermal_zone(&self.thermal_zone)
            .with_policy_cpu_speed(self.cpu_speed_policy)
            .with_nodeos_cpu_speed(self.cpu_speed_nodeos)
            .with_drive_info(self.drive_info)
            .with_probe_timeout(Duration::from_millis(self.probe_timeout_ms))
    }

    fn web_config(&self) -> WebConfig {
        WebConfig::new(&self.host, self.port).with_cors(self.cors)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Snapshot(args)) => snapshot_command(&cli, args).await,
        Some(Commands::Serve) | None => serve_command(&cli).await,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // RUST_LOG wins over the command line flags
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

async fn serve_command(cli: &Cli) -> anyhow::Result<()> {
    let collector = MetricsCollector::new(cli.collector_config());
    let collector_config = collector.config();
    let web_config = cli.web_config();

    info!("Starting hostpulse...");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", web_config.enable_cors);
    info!("  - Thermal zone: {}", collector_config.thermal_zone_path.display());
    info!("  - Policy CPU speed: {}", collector_config.enable_policy_cpu_speed);
    info!("  - OS CPU speed: {}", collector_config.enable_nodeos_cpu_speed);
    info!("  - Drive info: {}", collector_config.enable_drive_info);
    info!("  - Probe timeout: {:?}", collector_config.probe_timeout);

    start_web_server(web_config, collector)
        .await
        .context("web server stopped")?;

    Ok(())
}

async fn snapshot_command(cli: &Cli, args: &SnapshotArgs) -> anyhow::Result<()> {
    let collector = MetricsCollector::new(cli.collector_config());
    let snapshot = collector.collect().await.context("collecting snapshot")?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        "pretty" => print_pretty_snapshot(&snapshot),
        other => anyhow::bail!("Unsupported format: {other}. Use 'json' or 'pretty'"),
    }

    Ok(())
}

fn print_pretty_snapshot(snapshot: &MetricsSnapshot) {
    println!(
        "System Snapshot ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("==========================================");
    println!();

    println!("CPU:");
    println!("  Model: {}", snapshot.cpu_model);
    println!("  Temperature: {:.2}°C", snapshot.cpu_temperature);
    println!(
        "  Load: {:.2}, {:.2}, {:.2}",
        snapshot.cpu_load1, snapshot.cpu_load5, snapshot.cpu_load15
    );
    println!(
        "  Usage: {:.2}% (idle {:.2}%)",
        snapshot.cpu_current, snapshot.cpu_free
    );
    if let (Some(avg), Some(max)) = (snapshot.cpu_avg_speed_policy, snapshot.cpu_max_speed_policy) {
        println!("  Speed (cpufreq): avg {avg} MHz, max {max} MHz");
    }
    if let (Some(avg), Some(max)) = (snapshot.cpu_avg_speed_nodeos, snapshot.cpu_max_speed_nodeos) {
        println!("  Speed (OS): avg {avg} MHz, max {max} MHz");
    }
    println!();

    println!("Memory:");
    println!(
        "  {:.1} MB used of {:.1} MB ({:.2}%)",
        snapshot.memory.used_mem_mb, snapshot.memory.total_mem_mb, snapshot.memory.used_mem_percentage
    );
    println!();

    if let Some(drive) = &snapshot.drive {
        println!("Drive:");
        println!(
            "  {:.2} GB used of {:.2} GB ({:.2}%)",
            drive.used_gb, drive.total_gb, drive.used_percentage
        );
        println!();
    }

    if !snapshot.network.is_empty() {
        println!("Network:");
        for (name, iface) in &snapshot.network {
            print!(
                "  {}: RX {:.1} MB, TX {:.1} MB",
                name,
                iface.input_bytes as f64 / 1024.0 / 1024.0,
                iface.output_bytes as f64 / 1024.0 / 1024.0
            );
            match &iface.wireless {
                Some(wireless) => println!(
                    " (link {}, level {} dBm)",
                    wireless.quality_link, wireless.quality_level
                ),
                None => println!(),
            }
        }
        println!();
    }

    println!("System:");
    println!("  OS: {} ({})", snapshot.oos, snapshot.platform);
    println!("  Uptime: {} seconds", snapshot.os_uptime);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["hostpulse", "--port", "9090"]).unwrap();
        assert_eq!(cli.port, 9090);
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["hostpulse"]).unwrap();
        let config = cli.collector_config();

        assert_eq!(cli.host, "0.0.0.0");
        assert!(config.enable_policy_cpu_speed);
        assert!(config.enable_nodeos_cpu_speed);
        assert!(!config.enable_drive_info);
        assert_eq!(config.thermal_zone_path, PathBuf::from(DEFAULT_THERMAL_ZONE));
    }

    #[test]
    fn test_toggles_accept_falsy_values() {
        for value in ["false", "0", "no", "off"] {
            let cli = Cli::try_parse_from([
                "hostpulse",
                "--cpu-speed-policy",
                value,
                "--cpu-speed-nodeos",
                value,
            ])
            .unwrap();
            assert!(!cli.cpu_speed_policy, "{value} should disable the policy probe");
            assert!(!cli.cpu_speed_nodeos, "{value} should disable the OS probe");
        }
    }

    #[test]
    fn test_snapshot_subcommand() {
        let cli = Cli::try_parse_from(["hostpulse", "snapshot", "--format", "pretty"]).unwrap();
        match cli.command {
            Some(Commands::Snapshot(args)) => assert_eq!(args.format, "pretty"),
            _ => panic!("expected snapshot subcommand"),
        }
    }

    #[test]
    fn test_web_config() {
        let cli = Cli::try_parse_from(["hostpulse", "--host", "127.0.0.1"]).unwrap();
        let config = cli.web_config();
        assert_eq!(config.bind_address(), format!("127.0.0.1:{DEFAULT_LISTEN_PORT}"));
        assert!(!config.enable_cors);

        let cli = Cli::try_parse_from(["hostpulse", "--cors", "true"]).unwrap();
        assert!(cli.web_config().enable_cors);
    }
}
