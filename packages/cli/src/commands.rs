//! Command implementations shared by subcommands and the interactive menu.

use std::path::Path;

use console::style;
use water_map_app::add_point::{PointForm, submit_address, submit_point};
use water_map_app::heatmap::load_heatmap;
use water_map_app::location::LocationProvider;
use water_map_app::login::{login, logout, require_session};
use water_map_app::render::HeatmapRenderer;
use water_map_cli_utils::IndicatifProgress;
use water_map_geocoder::address::AddressForm;

use crate::context::Context;
use crate::render::{GeoJsonRenderer, TerminalRenderer};

/// Runs one heatmap refresh, drawing to the terminal or to `geojson`.
/// The flow clears the spinner itself.
pub async fn heatmap(ctx: &Context, location: &dyn LocationProvider, geojson: Option<&Path>) {
    let mut renderer: Box<dyn HeatmapRenderer> = match geojson {
        Some(path) => Box::new(GeoJsonRenderer::new(path)),
        None => Box::new(TerminalRenderer::new(std::io::stdout())),
    };

    let progress = IndicatifProgress::spinner(&ctx.multi, "Loading heatmap...");
    let screen = load_heatmap(
        location,
        &ctx.points,
        renderer.as_mut(),
        &ctx.notifier,
        progress.as_ref(),
    )
    .await;

    if let Some(error) = &screen.error {
        println!("{}", style(error).red());
        return;
    }

    if screen.region.is_none() {
        let region = screen.display_region();
        println!(
            "Map centered on ({:.5}, {:.5})",
            region.latitude, region.longitude
        );
    }
}

/// Adds a point from typed latitude, longitude and value. Requires login.
pub async fn add(ctx: &Context, form: &PointForm) {
    if require_session(&ctx.session, &ctx.notifier).is_err() {
        return;
    }

    let progress = IndicatifProgress::spinner(&ctx.multi, "Saving point...");
    let result = submit_point(&ctx.points, form, &ctx.notifier).await;
    progress.finish_and_clear();

    if let Ok(point) = result {
        log::info!(
            "Saved value {} at ({}, {})",
            point.value,
            point.latitude,
            point.longitude
        );
    }
}

/// Adds a point at a geocoded address. Requires login.
pub async fn add_address(ctx: &Context, form: &AddressForm) {
    if require_session(&ctx.session, &ctx.notifier).is_err() {
        return;
    }

    let progress = IndicatifProgress::spinner(&ctx.multi, "Looking up address...");
    let result = submit_address(
        ctx.geocoder(),
        &ctx.points,
        form,
        ctx.config.geocoder.default_weight,
        &ctx.notifier,
    )
    .await;
    progress.finish_and_clear();

    if let Ok(point) = result {
        log::info!("Saved address point at ({}, {})", point.latitude, point.longitude);
    }
}

/// Logs in and keeps the new session in `ctx`.
pub async fn log_in(ctx: &mut Context, email: &str, password: &str) {
    let progress = IndicatifProgress::spinner(&ctx.multi, "Logging in...");
    let result = login(&ctx.gate, email, password, &ctx.notifier).await;
    progress.finish_and_clear();

    if let Ok(session) = result {
        ctx.session = session;
    }
}

pub fn log_out(ctx: &mut Context) {
    logout(&ctx.gate, &mut ctx.session, &ctx.notifier);
}

/// Prints session and endpoint details.
pub fn status(ctx: &Context) {
    let session = if ctx.session.is_authenticated() {
        style("logged in").green()
    } else {
        style("logged out").yellow()
    };

    println!("Session:       {session}");
    println!("Data service:  {}", ctx.config.water_manager.base_url);
    println!("Login service: {}", ctx.config.auth.base_url);
    println!(
        "Address lookup: {}",
        if ctx.geocoder().is_some() {
            "enabled"
        } else {
            "disabled (no API key)"
        }
    );
    println!("Token store:   {}", ctx.gate.store().path().display());
}
