#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use proxy_node::cli::{Args, Command};
use proxy_node::config::{CoreOptions, EngineConfig};
use proxy_node::parser::default_registry;
use tracing::Level;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Schemes => {
            for scheme in default_registry().schemes() {
                println!("{scheme}");
            }
        }
        Command::Parse { uris, file } => parse(&uris, file.as_deref()).await?,
        Command::Render {
            uri,
            config,
            output,
        } => render(&uri, config.as_deref(), output.as_deref()).await?,
    }
    Ok(())
}

async fn parse(uris: &[String], file: Option<&Path>) -> Result<()> {
    let registry = default_registry();

    let mut providers = Vec::new();
    for uri in uris {
        let provider = registry
            .parse(uri)
            .with_context(|| format!("Failed to parse {uri}"))?;
        providers.push(provider);
    }

    if let Some(path) = file {
        tracing::info!("Loading share links from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read share links from {:?}", path))?;
        providers.extend(registry.parse_list_lossy(&content));
    }

    if providers.is_empty() {
        anyhow::bail!("No share links given");
    }

    for provider in &providers {
        let outbound = provider
            .outbound()
            .with_context(|| format!("Failed to encode {} outbound", provider.name()))?;
        println!("{}", serde_json::to_string_pretty(&outbound)?);
    }

    tracing::info!("Parsed {} share link(s)", providers.len());
    Ok(())
}

async fn render(uri: &str, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let options = match config {
        Some(path) => {
            tracing::info!("Loading core options from: {}", path.display());
            CoreOptions::from_file(path).await?
        }
        None => CoreOptions::default(),
    };

    let provider = default_registry()
        .parse(uri)
        .with_context(|| format!("Failed to parse {uri}"))?;
    let outbound = provider
        .outbound()
        .with_context(|| format!("Failed to encode {} outbound", provider.name()))?;
    let json = EngineConfig::assemble(outbound, &options)
        .to_json_pretty()
        .context("Failed to serialize engine config")?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            tracing::info!("Engine config written to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
