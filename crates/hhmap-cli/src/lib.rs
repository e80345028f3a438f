//! Command line host for the happy-hour map
//!
//! Drives [`hhmap_core::MapApp`] over a [`headless::HeadlessMap`] so the
//! map page can be exercised from a terminal.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod geo;
pub mod headless;
pub mod output;
pub mod telemetry;

pub use commands::{build_config, cli, draft_from_matches};
pub use geo::FixedPosition;
pub use headless::{HeadlessMap, HeadlessMarker};
pub use telemetry::LogFormat;
