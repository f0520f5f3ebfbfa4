//! Dramatis CLI - load and inspect character context bundles.
//!
//! Thin operational wrapper over the library engine: load a bundle,
//! probe a character directory, or dump the effective configuration and
//! statistics, all as JSON/YAML for scripting.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dramatis::{ContextLoader, LoaderConfig};

#[derive(Parser)]
#[command(name = "dramatis", version, about = "Character context bundle loader")]
struct Cli {
    /// Path to a loader configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the content root directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a character bundle and print its summary
    Load {
        /// Character identifier (sanitised automatically)
        identifier: String,

        /// Print the full bundle instead of the summary
        #[arg(long)]
        full: bool,
    },

    /// Probe which context files exist for a character
    Validate {
        /// Character identifier (sanitised automatically)
        identifier: String,
    },

    /// Print the loader statistics snapshot
    Stats,

    /// Print the default configuration as YAML
    PrintDefaultConfig,
}

fn build_config(cli: &Cli) -> anyhow::Result<LoaderConfig> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::from_yaml_file(path)?,
        None => LoaderConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.content_root = root.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = build_config(&cli)?;

    match cli.command {
        Commands::Load { identifier, full } => {
            let loader = ContextLoader::new(config)?;
            let bundle = loader.load(&identifier).await?;
            if full {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&bundle.summary())?);
            }
        }
        Commands::Validate { identifier } => {
            let loader = ContextLoader::new(config)?;
            let report = loader.validate_directory(&identifier).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Stats => {
            let loader = ContextLoader::new(config)?;
            println!("{}", serde_json::to_string_pretty(&loader.get_statistics())?);
        }
        Commands::PrintDefaultConfig => {
            print!("{}", serde_yaml::to_string(&LoaderConfig::default())?);
        }
    }

    Ok(())
}
