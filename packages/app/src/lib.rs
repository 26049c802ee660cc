#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Screen flows of the water map client.
//!
//! Each flow is a plain async function that drives one screen of the
//! client against explicit collaborators:
//!
//! - [`heatmap::load_heatmap`] acquires the device location, fetches and
//!   normalizes points, fits the map region and hands everything to a
//!   [`render::HeatmapRenderer`].
//! - [`add_point::submit_point`] and [`add_point::submit_address`] validate
//!   form input (geocoding the address when needed) and insert a point.
//! - [`login::login`], [`login::logout`] and [`login::restore_session`]
//!   manage the explicit [`water_map_auth::Session`].
//!
//! Failures never escape a flow: they are logged and turned into a
//! [`notify::Notification`] shown through a [`notify::Notifier`].

pub mod add_point;
pub mod heatmap;
pub mod location;
pub mod login;
pub mod notify;
pub mod progress;
pub mod render;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
