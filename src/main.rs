//! duckdns-updater - detect public addresses and push them to DuckDNS.

use clap::{Parser, Subcommand};
use duckdns_updater::config::Config;
use duckdns_updater::detector::{
    AddressFamily, AddressResolver, Ipv4Strategy, Ipv6Strategy, ResolvedAddresses,
};
use duckdns_updater::error::DdnsError;
use duckdns_updater::providers::{resolve_env, DuckDnsProvider};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duckdns-updater")]
#[command(about = "Detect public IPv4/IPv6 addresses and update DuckDNS")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// IPv4 strategy: ipify, ipip-net, routing-table or disabled
    #[arg(long, global = true)]
    ipv4: Option<Ipv4Strategy>,

    /// IPv6 strategy: interface-table or ipip-net
    #[arg(long, global = true)]
    ipv6: Option<Ipv6Strategy>,

    /// Keep link-local and LAN addresses
    #[arg(long, global = true)]
    keep_lan: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected addresses as JSON
    Resolve,

    /// Detect addresses and push them to DuckDNS (default)
    Update,

    /// Validate configuration
    Validate,

    /// Write an example configuration file
    Init {
        /// Output path (defaults to the user config directory)
        output: Option<PathBuf>,
    },
}

fn get_config_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }

    // Default locations
    let candidates = [
        Config::default_path().ok(),
        Some(PathBuf::from("/etc/duckdns-updater/config.toml")),
        Some(PathBuf::from("config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from("config.toml")
}

fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command.as_ref().unwrap_or(&Commands::Update) {
        Commands::Resolve => cmd_resolve(load_config(&cli)?).await?,
        Commands::Update => cmd_update(load_config(&cli)?).await?,
        Commands::Validate => cmd_validate(load_config(&cli)?)?,
        Commands::Init { output } => cmd_init(output.clone())?,
    }

    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config_path = get_config_path(cli.config.clone());
    tracing::debug!("Using config {}", config_path.display());
    let mut config = Config::load_from(&config_path)?;

    if let Some(ipv4) = cli.ipv4 {
        config.ipv4 = ipv4;
    }
    if let Some(ipv6) = cli.ipv6 {
        config.ipv6 = ipv6;
    }
    if cli.keep_lan {
        config.remove_lan = false;
    }

    Ok(config)
}

fn cmd_init(output: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match output {
        Some(path) => path,
        None => Config::default_path()?,
    };
    Config::example().save_to(&path)?;
    println!("Configuration template written to: {}", path.display());
    Ok(())
}

async fn resolve(config: &Config) -> anyhow::Result<ResolvedAddresses> {
    let resolver = AddressResolver::new(config.filter(), config.skip_wireless, config.timeout())?;
    let mut resolved = resolver.resolve(config.ipv4, config.ipv6).await?;

    if let Some(spec) = &config.ipv6_suffix {
        if let Some(first) = resolved.ipv6.first_mut() {
            let composed = spec.apply(first)?;
            tracing::debug!("Composed {} from {}", composed, first);
            *first = composed.to_string();
        }
    }

    Ok(resolved)
}

async fn cmd_resolve(config: Config) -> anyhow::Result<()> {
    let resolved = resolve(&config).await?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

async fn cmd_update(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let resolved = resolve(&config).await?;
    eprintln!("{}", serde_json::to_string_pretty(&resolved)?);

    let provider = DuckDnsProvider::new(
        config.domain_list().iter().map(|d| d.to_string()).collect(),
        resolve_env(&config.token),
        config.timeout(),
    )?;

    let result = provider
        .update(
            resolved.primary(AddressFamily::V4),
            resolved.primary(AddressFamily::V6),
        )
        .await?;

    eprintln!("{}", serde_json::to_string_pretty(&result)?);
    println!("{}", result.response);

    if !result.success {
        return Err(DdnsError::Provider {
            provider: result.provider,
            message: result.error.unwrap_or_default(),
        }
        .into());
    }

    for hostname in provider.hostnames() {
        println!("{}", hostname);
    }

    Ok(())
}

fn cmd_validate(config: Config) -> anyhow::Result<()> {
    println!("Validating configuration...\n");

    config.validate()?;

    let provider = DuckDnsProvider::new(
        config.domain_list().iter().map(|d| d.to_string()).collect(),
        resolve_env(&config.token),
        config.timeout(),
    )?;

    println!("  domains: {}", provider.hostnames().join(", "));
    println!("  ipv4:    {}", config.ipv4);
    println!("  ipv6:    {}", config.ipv6);
    println!("  remove_lan: {}", config.remove_lan);

    if let Some(spec) = &config.ipv6_suffix {
        println!("  ipv6_suffix: {}/{}", spec.suffix, spec.prefix_len);
    }

    println!("\nConfiguration is valid.");
    Ok(())
}
