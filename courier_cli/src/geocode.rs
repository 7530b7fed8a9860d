use clap::Subcommand;
use courier_geocoding::client::{GeocodingClient, GeocodingClientParams};
use tracing::info;

#[derive(Subcommand)]
pub enum GeocodeSubcommands {
    /// Street address at a point
    Reverse {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },
    Search {
        text: String,
    },
    Autocomplete {
        text: String,
    },
    /// Search results as a FeatureCollection
    Geojson {
        text: String,
    },
}

pub async fn run(subcommand: GeocodeSubcommands) -> anyhow::Result<()> {
    let client = GeocodingClient::new(GeocodingClientParams::from_env()?);

    let output = match subcommand {
        GeocodeSubcommands::Reverse { lon, lat } => match client.reverse(lon, lat).await? {
            Some(address) => serde_json::to_string_pretty(&address)?,
            None => {
                info!("No address found at {}, {}", lon, lat);
                return Ok(());
            }
        },
        GeocodeSubcommands::Search { text } => {
            serde_json::to_string_pretty(&client.search(&text).await?)?
        }
        GeocodeSubcommands::Autocomplete { text } => {
            serde_json::to_string_pretty(&client.autocomplete(&text).await?)?
        }
        GeocodeSubcommands::Geojson { text } => {
            serde_json::to_string_pretty(&client.search_geojson(&text).await?)?
        }
    };

    println!("{}", output);

    Ok(())
}
