//! Auris mDNS Monitor
//!
//! Watches multicast DNS traffic on selected network interfaces and
//! prints every query and announcement as it happens.

mod print;
mod trace;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::style;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

use auris_net::{
    Family, InterfaceDirectory, InterfaceInfo, ListenerLoop, MulticastSocket, MDNS_PORT,
};
use auris_proto::{encode_query, Name, RecordType};

use print::Printer;
use trace::{init_tracing, LogConfig, LogFormat};

/// Auris - watch mDNS traffic on your network
#[derive(Parser, Debug)]
#[command(name = "auris")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Interfaces to monitor, by name (eth0) or by assigned address
    /// (192.168.1.5). With no selection, lists interfaces and exits.
    #[arg(value_name = "INTERFACE")]
    selectors: Vec<String>,

    /// Monitor every usable multicast interface
    #[arg(short, long, conflicts_with = "selectors")]
    all: bool,

    /// UDP port to listen on
    #[arg(short, long, default_value_t = MDNS_PORT)]
    port: u16,

    /// Send a PTR probe for this name after startup, to coax the network
    /// into answering
    #[arg(
        long,
        value_name = "NAME",
        num_args = 0..=1,
        default_missing_value = "_services._dns-sd._udp.local"
    )]
    probe: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: String,

    /// Quiet mode (errors only, no banner)
    #[arg(short, long)]
    quiet: bool,
}

/// Parse log level from string
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging/tracing subsystem
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else if let Some(ref lvl) = cli.log_level {
        parse_log_level(lvl)
    } else {
        Level::INFO
    };

    let format = match cli.log_format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    };

    init_tracing(&LogConfig {
        level,
        format,
        span_events: false,
    });
}

/// Print the startup banner
fn print_banner(interfaces: &[InterfaceInfo], quiet: bool) {
    if quiet {
        return;
    }

    let version = env!("CARGO_PKG_VERSION");

    println!();
    println!(
        "  {} {}",
        style("Auris mDNS Monitor").cyan().bold(),
        style(format!("v{version}")).dim()
    );
    let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
    println!(
        "  {} {}",
        style("Watching:").green(),
        names.join(", ")
    );
    println!();
}

/// List interfaces, the no-selection default
fn print_interfaces(directory: &InterfaceDirectory) {
    println!("{}", style("Available interfaces:").bold());
    for iface in directory.iter() {
        let marker = if iface.usable() {
            style("*").green()
        } else {
            style(" ").dim()
        };
        println!("  {marker} {iface}");
    }
    println!();
    println!(
        "{}",
        style("Pass interface names or addresses to start monitoring (* = usable).").dim()
    );
}

/// Resolves selection tokens against the directory. Each token is tried
/// as an interface name first, then as an assigned IP address.
fn select_interfaces(directory: &InterfaceDirectory, cli: &Cli) -> Result<Vec<InterfaceInfo>> {
    if cli.all {
        let selected: Vec<InterfaceInfo> =
            directory.iter().filter(|i| i.usable()).cloned().collect();
        if selected.is_empty() {
            bail!("no usable multicast interfaces found");
        }
        return Ok(selected);
    }

    let mut selected: Vec<InterfaceInfo> = Vec::new();
    for token in &cli.selectors {
        let found = directory.lookup_by_name(token).or_else(|| {
            token
                .parse::<IpAddr>()
                .ok()
                .and_then(|ip| directory.lookup_by_ip(ip))
        });
        let Some(iface) = found else {
            bail!("'{token}' matches no interface name or address");
        };
        if !selected.iter().any(|i| i.name == iface.name) {
            selected.push(iface.clone());
        }
    }
    if selected.is_empty() {
        bail!("no interfaces selected");
    }
    Ok(selected)
}

/// Binds a family's socket, joins its group on every selected interface
/// that carries an address of that family, and optionally probes.
async fn start_family(
    family: Family,
    cli: &Cli,
    selected: &[InterfaceInfo],
    printer: Arc<Printer>,
    shutdown: CancellationToken,
) -> Result<Option<tokio::task::JoinHandle<auris_net::Result<()>>>> {
    let members: Vec<&InterfaceInfo> = selected
        .iter()
        .filter(|i| match family {
            Family::V4 => i.ipv4().is_some(),
            Family::V6 => i.ipv6().is_some(),
        })
        .collect();
    if members.is_empty() {
        return Ok(None);
    }

    let socket = MulticastSocket::bind(family, cli.port)
        .with_context(|| format!("failed to bind {family} socket on port {}", cli.port))?;
    for iface in &members {
        socket
            .join_group(iface)
            .with_context(|| format!("failed to join {family} group on {}", iface.name))?;
        info!(%family, interface = %iface.name, "joined multicast group");
    }

    if let Some(ref name) = cli.probe {
        let name: Name = name
            .parse()
            .with_context(|| format!("invalid probe name '{name}'"))?;
        let query = encode_query(rand::random(), &name, RecordType::PTR, false);
        let target = SocketAddr::new(family.group(), cli.port);
        socket
            .send_to(&query, target)
            .await
            .with_context(|| format!("failed to send {family} probe"))?;
        info!(%family, probe = %name, "probe sent");
    }

    Ok(Some(tokio::spawn(
        ListenerLoop::new(socket, printer, shutdown).run(),
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let directory = InterfaceDirectory::discover().context("failed to enumerate interfaces")?;

    if cli.selectors.is_empty() && !cli.all {
        print_interfaces(&directory);
        return Ok(());
    }

    let selected = select_interfaces(&directory, &cli)?;
    print_banner(&selected, cli.quiet);

    let printer = Arc::new(Printer::new(directory));
    let shutdown = CancellationToken::new();

    let mut tasks = Vec::new();
    for family in [Family::V4, Family::V6] {
        if let Some(task) =
            start_family(family, &cli, &selected, printer.clone(), shutdown.clone()).await?
        {
            tasks.push(task);
        }
    }
    if tasks.is_empty() {
        bail!("selected interfaces carry no usable addresses");
    }

    // Bridge SIGINT/SIGTERM into the cancellation token.
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to register SIGTERM handler");
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, stopping...");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, stopping...");
            }
        }

        shutdown_signal.cancel();
    });

    for task in tasks {
        task.await.context("listener task panicked")??;
    }

    info!("Auris stopped");
    Ok(())
}
