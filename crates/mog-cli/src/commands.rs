use anyhow::Context;
use colored::Colorize;

use mog_protocol::PROTOCOL_VERSION;
use mog_server::{HandlerSeed, MogServer, ServerConfig};
use mog_types::{HandlerAddress, HandlerId};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Version => {
            println!("mogd {} (protocol {})", env!("CARGO_PKG_VERSION"), PROTOCOL_VERSION.to_string().bold());
            Ok(())
        }
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(host) = args.public_host {
        config.public_host = host;
    }
    for spec in &args.handlers {
        config.handlers.push(parse_handler_seed(spec)?);
    }

    let server = MogServer::new(config)?;
    println!(
        "{} media server on {} ({} handler address(es) pre-registered)",
        "▶".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().handlers.len(),
    );
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = ServerConfig::load(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    println!("{} {} is valid", "✓".green().bold(), args.path.display());
    println!("  bind:      {}", config.bind_addr);
    println!("  endpoints: {}", config.http_base_url().cyan());
    for seed in &config.handlers {
        println!("  handler:   {} -> {}", seed.id, seed.address.yellow());
    }
    Ok(())
}

/// Parses `ID=HOST:PORT`.
fn parse_handler_seed(spec: &str) -> anyhow::Result<HandlerSeed> {
    let (id, address) = spec
        .split_once('=')
        .with_context(|| format!("expected ID=HOST:PORT, got {spec:?}"))?;
    let id: HandlerId = id.parse()?;
    let address: HandlerAddress = address.parse()?;
    Ok(HandlerSeed { id, address: address.to_string() })
}
