//! Test fixtures for canvass-planner.
//!
//! Provides realistic test data including:
//! - Households in three Wentzville, MO neighbourhoods with coordinates
//! - Helpers turning them into address lists and an offline geocoder

pub mod wentzville_households;

pub use wentzville_households::*;
