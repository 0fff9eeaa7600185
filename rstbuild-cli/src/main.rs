//! # rstbuild CLI
//!
//! Command-line interface for the rstbuild documentation compiler.

mod commands;

use clap::Parser;
use rstbuild_core::Target;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rstbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "rstbuild.yml")]
    config: PathBuf,

    /// Directory the source, cache and build paths resolve against
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Target to run (build, clean, rebuild)
    target: Option<String>,
}

fn usage() -> String {
    let mut text = String::from("Usage: rstbuild [OPTIONS] <TARGET>\n\nTargets:\n");
    for target in Target::ALL {
        text.push_str(&format!("  {:<9}{}\n", target.as_str(), target.description()));
    }
    text
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(target) = cli.target.as_deref().and_then(|name| name.parse::<Target>().ok()) else {
        if let Some(name) = &cli.target {
            eprintln!("Unsupported target: {}\n", name);
        }
        eprint!("{}", usage());
        std::process::exit(2);
    };

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = commands::load_config(&cli.config, cli.base_dir.as_deref())?;

    match target {
        Target::Build => commands::build_project(&config),
        Target::Clean => commands::clean_project(&config),
        Target::Rebuild => commands::rebuild_project(&config),
    }
}
