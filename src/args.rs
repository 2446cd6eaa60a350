use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments for meteo
#[derive(Debug, Parser)]
#[command(
    name = "meteo",
    version,
    about = "Search cities and show Open-Meteo forecasts"
)]
pub struct CliArgs {
    /// Path to the config file (default: <config dir>/meteo/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search cities by name (lists the default cities when no query is given)
    Search {
        /// Place name, e.g. "New York"
        query: Option<String>,
    },

    /// Show the forecast for a coordinate pair
    Forecast {
        /// Latitude in degrees (-90 to 90)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees (-180 to 180)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Search a city and show the forecast for the first match
    City {
        /// Place name
        query: String,
    },
}
