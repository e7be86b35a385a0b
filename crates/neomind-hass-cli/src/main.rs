//! Command-line interface for inspecting Home Assistant discovery messages.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use neomind_hass_mqtt::{
    parse_discovery_message, ChannelList, Component, ComponentType, DiscoverySettings,
    DEFAULT_DISCOVERY_PREFIX,
};
use serde_json::json;

/// NeoMind HASS - Inspect Home Assistant MQTT discovery configurations.
#[derive(Parser, Debug)]
#[command(name = "neomind-hass")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Show the channels a discovery payload produces.
    Inspect {
        /// Discovery topic the payload was published on.
        #[arg(short, long)]
        topic: String,
        /// Discovery prefix.
        #[arg(long, default_value = DEFAULT_DISCOVERY_PREFIX)]
        prefix: String,
        /// Payload file, `-` for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
        /// Print JSON on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Print MQTT subscription patterns for discovery topics.
    Patterns {
        /// Limit to one component type.
        #[arg(short, long)]
        component: Option<ComponentType>,
        /// Discovery prefix.
        #[arg(long, default_value = DEFAULT_DISCOVERY_PREFIX)]
        prefix: String,
    },
    /// List supported component types.
    Components,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Inspect {
            topic,
            prefix,
            file,
            compact,
        } => inspect(&topic, &prefix, &file, compact),
        Command::Patterns { component, prefix } => {
            let settings = DiscoverySettings::with_prefix(prefix);
            for pattern in settings.subscription_patterns(component) {
                println!("{}", pattern);
            }
            Ok(())
        }
        Command::Components => {
            for component in ComponentType::ALL {
                println!("{}", component);
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    // Check if JSON logging is requested (for production/container environments)
    let json_logging = std::env::var("NEOMIND_LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        tracing_subscriber::EnvFilter::new(format!("neomind_hass={level},neomind_hass_mqtt={level}"))
    });

    // Logs go to stderr so stdout stays machine-readable.
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .init();
    }
}

fn read_payload(file: &Path) -> Result<Vec<u8>> {
    if file.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read payload from stdin")?;
        return Ok(buf);
    }
    std::fs::read(file).with_context(|| format!("Failed to read payload from {}", file.display()))
}

/// Assemble the component and print it with its registrations.
fn inspect(topic: &str, prefix: &str, file: &Path, compact: bool) -> Result<()> {
    let payload = read_payload(file)?;
    let settings = DiscoverySettings::with_prefix(prefix);

    let msg = parse_discovery_message(&settings, topic, &payload)
        .with_context(|| format!("Rejected discovery message on {}", topic))?;
    let component = Component::from_message(&msg).context("Failed to assemble component")?;

    let mut registry = ChannelList::new();
    component.register(&mut registry, None);
    tracing::debug!(registered = registry.len(), "Channels registered");

    let uids: Vec<String> = registry.iter().map(|r| r.uid()).collect();
    let report = json!({
        "id": component.id(),
        "component": component.component_type(),
        "name": component.name(),
        "availability": component.availability(),
        "json_attributes": component.json_attributes(),
        "channels": component.channels(),
        "registrations": uids,
    });

    let output = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);
    Ok(())
}
