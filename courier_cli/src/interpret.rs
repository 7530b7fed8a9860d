use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Args;
use courier_routing::interpreter::interpret_response;
use serde_json::Value;
use tracing::info;

use crate::marker_table::print_markers;

#[derive(Args)]
pub struct InterpretArgs {
    /// Routing service response saved as JSON
    #[arg(short, long)]
    input: PathBuf,

    /// Also print the route summary
    #[arg(short, long)]
    summary: bool,
}

pub fn run(args: InterpretArgs) -> anyhow::Result<()> {
    info!("Interpreting {:?}", args.input);

    let reader = BufReader::new(File::open(&args.input)?);
    let response: Value = serde_json::from_reader(reader)?;
    let display = interpret_response(&response)?;

    print_markers(&display.markers);

    if args.summary {
        println!("{}", serde_json::to_string_pretty(&display.summary)?);
    }

    Ok(())
}
