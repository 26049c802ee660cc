#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the water map client.
//!
//! ```text
//! water_map heatmap [--geojson out.geojson] [--location -29.68,-51.13]
//! water_map add --latitude -29.68 --longitude -51.13 --value 3.2
//! water_map add-address --street "Rua X" --number 10 --city "Novo Hamburgo"
//! water_map login [--email ana@example.com]
//! water_map logout
//! water_map status
//! ```
//!
//! Running `water_map` with no subcommand enters interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`water_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and spinners never fight for the terminal.

mod commands;
mod context;
mod interactive;
mod location;
mod notifier;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Password};
use water_map_app::add_point::PointForm;
use water_map_geocoder::address::AddressForm;
use water_map_point_models::Coordinates;

use crate::context::Context;
use crate::location::{parse_location, resolve_location};

#[derive(Parser)]
#[command(name = "water_map", about = "Water measurement heatmap client")]
struct Cli {
    /// TOML file overriding the built-in configuration (defaults to
    /// WATER_MAP_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch recent points and draw the heatmap
    Heatmap {
        /// Write a GeoJSON file instead of drawing in the terminal
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Device location as lat,lon (defaults to WATER_MAP_LOCATION)
        #[arg(long, value_parser = parse_location, allow_hyphen_values = true)]
        location: Option<Coordinates>,
    },
    /// Add a point by coordinates
    Add {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        latitude: String,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        longitude: String,
        /// Measured value
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        value: String,
    },
    /// Add a point at a street address
    AddAddress(AddressArgs),
    /// Log in to the measurement service
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored login
    Logout,
    /// Show session and endpoint details
    Status,
}

#[derive(Args)]
struct AddressArgs {
    #[arg(long, default_value = "")]
    street: String,
    #[arg(long, default_value = "")]
    number: String,
    #[arg(long, default_value = "")]
    neighborhood: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    country: String,
}

impl From<AddressArgs> for AddressForm {
    fn from(args: AddressArgs) -> Self {
        Self {
            street: args.street,
            number: args.number,
            neighborhood: args.neighborhood,
            city: args.city,
            state: args.state,
            country: args.country,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = water_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut ctx = Context::load(cli.config.as_deref(), multi)?;

    let Some(command) = cli.command else {
        return interactive::run(&mut ctx).await;
    };

    match command {
        Commands::Heatmap { geojson, location } => {
            let provider = resolve_location(location, |key| std::env::var(key).ok());
            commands::heatmap(&ctx, &provider, geojson.as_deref()).await;
        }
        Commands::Add {
            latitude,
            longitude,
            value,
        } => {
            let form = PointForm {
                latitude,
                longitude,
                value,
            };
            commands::add(&ctx, &form).await;
        }
        Commands::AddAddress(args) => {
            commands::add_address(&ctx, &args.into()).await;
        }
        Commands::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let password = Password::new().with_prompt("Password").interact()?;
            commands::log_in(&mut ctx, &email, &password).await;
        }
        Commands::Logout => commands::log_out(&mut ctx),
        Commands::Status => commands::status(&ctx),
    }

    Ok(())
}
