use clap::{Parser, Subcommand};
use tracing::debug;

use crate::{
    generate::GenerateSubcommands, geocode::GeocodeSubcommands, interpret::InterpretArgs,
    route::RouteArgs,
};

mod generate;
mod geocode;
mod interpret;
mod marker_table;
mod parsers;
mod route;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a route for a set of orders and print its markers
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },
    /// Interpret a saved routing service response
    Interpret {
        #[command(flatten)]
        args: InterpretArgs,
    },
    Geocode {
        #[command(subcommand)]
        commands: GeocodeSubcommands,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Route { args }) => route::run(args).await?,
        Some(Commands::Interpret { args }) => interpret::run(args)?,
        Some(Commands::Geocode { commands }) => geocode::run(commands).await?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => debug!("No command given"),
    }

    Ok(())
}
