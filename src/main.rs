use anyhow::Context;
use clap::{Parser, ValueEnum};
use firewall_compiler::{Firewall, FirewallConfig};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Compile a firewall rule file into a deployable processing graph.
#[derive(Debug, Parser)]
#[command(name = "firewall-compile", version, about)]
struct Args {
    /// Configuration file (YAML); defaults are used if missing or unreadable
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rule file, overriding the configured one
    #[arg(short, long)]
    rule_file: Option<String>,

    /// Segment identifier, overriding the configured one
    #[arg(short, long)]
    segment: Option<String>,

    /// Capture from this interface
    #[arg(long, conflicts_with = "dump")]
    interface: Option<String>,

    /// Replay this packet dump instead of capturing
    #[arg(long)]
    dump: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FirewallConfig::load_or_default(path),
        None => FirewallConfig::default(),
    };
    if let Some(rule_file) = args.rule_file {
        config = config.with_rule_file(rule_file);
    }
    if let Some(segment) = args.segment {
        config = config.with_segment(segment);
    }
    if let Some(interface) = args.interface {
        config = config.with_interface(interface);
    }
    if let Some(dump) = args.dump {
        config = config.with_dump(dump);
    }

    let topology = config.static_topology();
    let statements = Firewall::with_resolver(config, topology).statements();

    let rendered = match args.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&statements).context("serializing statements")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&statements).context("serializing statements")?
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}
