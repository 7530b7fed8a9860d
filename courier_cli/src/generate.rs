use std::path::PathBuf;

use clap::Subcommand;
use courier_routing::schema::{generate_request_schema, generate_summary_schema};

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    JsonSchema {
        /// Output folder for the request and summary schemas
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            std::fs::create_dir_all(&out)?;

            std::fs::write(
                out.join("route_request.schema.json"),
                generate_request_schema()?,
            )?;
            std::fs::write(
                out.join("route_summary.schema.json"),
                generate_summary_schema()?,
            )?;
        }
    }

    Ok(())
}
