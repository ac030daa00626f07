//! canvass-planner
//!
//! Batches street addresses into walkable canvassing routes: geocode,
//! cluster by proximity, split to route capacity, order each route's stops
//! through a directions provider, and report fleet metrics.

pub mod traits;
pub mod error;
pub mod haversine;
pub mod cluster;
pub mod capacity;
pub mod geocode;
pub mod sequencer;
pub mod report;
pub mod rate_limit;
pub mod planner;
pub mod google;
pub mod osrm;
pub mod osrm_data;
pub mod voters;
