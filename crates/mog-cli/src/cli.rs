use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mogd",
    about = "Media object graph server — pipelines, endpoints, mixers and filters over RPC",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the media server
    Serve(ServeArgs),
    /// Print the protocol version reported by getVersion
    Version,
    /// Validate a configuration file and print the effective settings
    CheckConfig(CheckConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the listen address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Override the host advertised in HTTP endpoint URLs
    #[arg(long)]
    pub public_host: Option<String>,
    /// Pre-register a handler address, as ID=HOST:PORT (repeatable)
    #[arg(long = "handler", value_name = "ID=HOST:PORT")]
    pub handlers: Vec<String>,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    pub path: PathBuf,
}
