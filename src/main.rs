use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod build;
mod commands;
mod config;
mod nostr;
mod util;

#[derive(Parser)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: InkpressCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the site in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "inkpress.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct PublishArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "inkpress.yaml")]
    config_file: Option<PathBuf>,

    /// Show what would be published without contacting any relay
    #[arg(short, long, default_value = "false")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum InkpressCommand {
    /// Initialize a new Inkpress site
    Init(InitArgs),

    /// Build the site into the output directory
    Build(BuildArgs),

    /// Publish posts to Nostr relays as long-form content
    Publish(PublishArgs),

    /// Generate a new Nostr key pair
    Keygen,

    /// Show the Nostr identity derived from the configured key
    Identity,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    match args.command {
        InkpressCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        InkpressCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
        InkpressCommand::Publish(args) => {
            commands::publish::run(&args).await?;
        }
        InkpressCommand::Keygen => {
            commands::keygen::run()?;
        }
        InkpressCommand::Identity => {
            commands::identity::run()?;
        }
    }

    Ok(())
}
