#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heatmap point preparation.
//!
//! Turns the loosely-typed records returned by the data service into a
//! de-duplicated set of [`HeatPoint`]s ([`normalize`]) and derives the map
//! camera that fits them ([`viewport::fit_region`]).
//!
//! [`HeatPoint`]: water_map_point_models::HeatPoint

pub mod normalize;
pub mod viewport;

pub use normalize::normalize;
pub use viewport::fit_region;
