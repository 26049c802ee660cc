//! Interactive mode.
//!
//! A menu loop over the same actions as the subcommands. Form fields are
//! collected with `dialoguer` prompts and passed through unvalidated; the
//! flows decide what is acceptable.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Password, Select};
use water_map_app::add_point::PointForm;
use water_map_geocoder::address::AddressForm;

use crate::commands;
use crate::context::Context;
use crate::location::{parse_location, resolve_location};

enum Action {
    Heatmap,
    AddPoint,
    AddAddress,
    Login,
    Logout,
    Status,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Heatmap,
        Self::AddPoint,
        Self::AddAddress,
        Self::Login,
        Self::Logout,
        Self::Status,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Heatmap => "Show heatmap",
            Self::AddPoint => "Add point by coordinates",
            Self::AddAddress => "Add point by address",
            Self::Login => "Log in",
            Self::Logout => "Log out",
            Self::Status => "Status",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub async fn run(ctx: &mut Context) -> Result<(), Box<dyn std::error::Error>> {
    println!("Water Map");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Heatmap => heatmap(ctx).await?,
            Action::AddPoint => {
                let form = PointForm {
                    latitude: prompt("Latitude")?,
                    longitude: prompt("Longitude")?,
                    value: prompt("Value")?,
                };
                commands::add(ctx, &form).await;
            }
            Action::AddAddress => {
                let form = AddressForm {
                    street: prompt("Street")?,
                    number: prompt("Number")?,
                    neighborhood: prompt("Neighborhood")?,
                    city: prompt("City")?,
                    state: prompt("State")?,
                    country: prompt("Country")?,
                };
                commands::add_address(ctx, &form).await;
            }
            Action::Login => {
                let email: String = Input::new().with_prompt("Email").interact_text()?;
                let password = Password::new().with_prompt("Password").interact()?;
                commands::log_in(ctx, &email, &password).await;
            }
            Action::Logout => commands::log_out(ctx),
            Action::Status => commands::status(ctx),
            Action::Quit => return Ok(()),
        }

        println!();
    }
}

async fn heatmap(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let location: String = Input::new()
        .with_prompt("Your location as lat,lon (blank for the default)")
        .allow_empty(true)
        .validate_with(|s: &String| -> Result<(), String> {
            if s.trim().is_empty() {
                Ok(())
            } else {
                parse_location(s).map(|_| ())
            }
        })
        .interact_text()?;
    let explicit = if location.trim().is_empty() {
        None
    } else {
        parse_location(&location).ok()
    };

    let geojson = if Confirm::new()
        .with_prompt("Export to a GeoJSON file instead of drawing?")
        .default(false)
        .interact()?
    {
        let path: String = Input::new()
            .with_prompt("Output path")
            .default("heatmap.geojson".to_string())
            .interact_text()?;
        Some(PathBuf::from(path))
    } else {
        None
    };

    let provider = resolve_location(explicit, |key| std::env::var(key).ok());
    commands::heatmap(ctx, &provider, geojson.as_deref()).await;

    Ok(())
}

/// Free-text prompt that accepts empty input.
fn prompt(label: &str) -> Result<String, dialoguer::Error> {
    Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
}
