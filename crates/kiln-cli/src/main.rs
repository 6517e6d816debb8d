//! kiln command line interface
//!
//! Named build tasks over a site directory: `images`, `pages` and
//! `clear-cache`. Configuration comes from `kiln.toml` next to the
//! site unless `--config` points elsewhere.

use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kiln_cache::DiskCache;
use kiln_pipeline::{tasks, PipelineConfig};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Command::new("kiln")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Static site asset pipeline")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .default_value("kiln.toml")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the pipeline configuration file"),
        )
        .subcommand(Command::new("images").about(
            "Optimize images into the destination directory, \
             or copy them verbatim when optimization is disabled",
        ))
        .subcommand(
            Command::new("clear-cache")
                .visible_alias("clearCache")
                .about("Clear the persistent image optimization cache"),
        )
        .subcommand(
            Command::new("pages")
                .about("Render Markdown pages to HTML with highlighted code blocks"),
        );

    let matches = cli.get_matches();
    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("kiln.toml"));
    let config = PipelineConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!(config = %config_path.display(), "configuration loaded");

    match matches.subcommand() {
        Some(("images", _)) => {
            let cache = open_cache(&config).await?;
            let report = tasks::images::run(&config, &cache).await?;
            println!("{}", report.summary());
        }
        Some(("clear-cache", _)) => {
            let cache = open_cache(&config).await?;
            let report = tasks::clear_cache::run(&cache).await?;
            println!("{}", report.summary());
        }
        Some(("pages", _)) => {
            let report = tasks::pages::run(&config).await?;
            println!("{}", report.summary());
        }
        _ => {}
    }

    Ok(())
}

async fn open_cache(config: &PipelineConfig) -> anyhow::Result<DiskCache> {
    let cache = DiskCache::new(&config.cache_dir);
    cache
        .init()
        .await
        .with_context(|| format!("opening cache at {}", config.cache_dir.display()))?;
    Ok(cache)
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("kiln_pipeline=info".parse()?)
        .add_directive("kiln_cache=info".parse()?)
        .add_directive("kiln_page=info".parse()?)
        .add_directive("kiln_cli=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}
