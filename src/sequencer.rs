//! Intra-group stop ordering.
//!
//! A group's first stop is the start and its last stop the end; the stops in
//! between are handed to a [`RouteOrderer`] for an optimised visiting order.

use serde::Serialize;
use tracing::debug;

use crate::error::SequencingError;
use crate::traits::{Address, GeoPoint, OrderedRoute, RouteOrderer, TravelMode};

/// Meters to statute miles.
pub const METERS_TO_MILES: f64 = 0.000621371;

/// Below this many miles a route counts as zero-length for efficiency.
pub const MIN_DISTANCE_MILES: f64 = 0.001;

/// Efficiency multiplier used for zero-length routes.
pub const SHORT_ROUTE_EFFICIENCY_FACTOR: f64 = 1000.0;

const MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// A sequenced route, ready to walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// 1-based index of the group this route came from.
    pub route_number: usize,
    #[serde(rename = "addresses")]
    pub ordered_addresses: Vec<Address>,
    pub maps_link: String,
    /// Miles, unrounded.
    pub total_distance: f64,
    /// Minutes, rounded.
    pub total_duration: i64,
    /// Stops per mile.
    pub efficiency: f64,
}

impl Route {
    pub fn stop_count(&self) -> usize {
        self.ordered_addresses.len()
    }
}

/// Stops per mile, saturating for routes shorter than [`MIN_DISTANCE_MILES`].
pub fn efficiency(stops: usize, distance_miles: f64) -> f64 {
    if distance_miles < MIN_DISTANCE_MILES {
        stops as f64 * SHORT_ROUTE_EFFICIENCY_FACTOR
    } else {
        stops as f64 / distance_miles
    }
}

/// Shareable directions link: origin, destination and ordered waypoints,
/// URL-encoded with waypoints pipe-delimited.
pub fn maps_link(
    origin: &str,
    destination: &str,
    waypoints: &[&str],
    travel_mode: TravelMode,
) -> String {
    let mut link = format!(
        "{}&origin={}&destination={}&travelmode={}",
        MAPS_DIR_URL,
        urlencoding::encode(origin),
        urlencoding::encode(destination),
        travel_mode.as_str()
    );

    if !waypoints.is_empty() {
        let joined = waypoints
            .iter()
            .map(|waypoint| urlencoding::encode(waypoint).into_owned())
            .collect::<Vec<_>>()
            .join("%7C");
        link.push_str("&waypoints=");
        link.push_str(&joined);
    }

    link
}

/// Sequences route groups through a route-ordering provider.
pub struct Sequencer<'a, O: ?Sized> {
    orderer: &'a O,
    travel_mode: TravelMode,
}

impl<'a, O: RouteOrderer + ?Sized> Sequencer<'a, O> {
    /// `travel_mode` is used for map links unless the orderer reports the
    /// mode it routes for.
    pub fn new(orderer: &'a O, travel_mode: TravelMode) -> Self {
        Self { orderer, travel_mode }
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.orderer.travel_mode().unwrap_or(self.travel_mode)
    }

    pub fn sequence(
        &self,
        route_number: usize,
        group: &[GeoPoint],
    ) -> Result<Route, SequencingError> {
        if group.len() < 2 {
            return Err(SequencingError::InsufficientStops { stops: group.len() });
        }

        let origin = &group[0];
        let destination = &group[group.len() - 1];
        let waypoints = &group[1..group.len() - 1];

        let ordered = self.orderer.order(origin, destination, waypoints)?;
        check_permutation(&ordered, waypoints.len())?;

        let ordered_waypoints: Vec<&str> = ordered
            .waypoint_order
            .iter()
            .map(|&index| waypoints[index].address.as_str())
            .collect();

        let mut ordered_addresses = Vec::with_capacity(group.len());
        ordered_addresses.push(origin.address.clone());
        ordered_addresses.extend(ordered_waypoints.iter().map(|address| address.to_string()));
        ordered_addresses.push(destination.address.clone());

        let meters: f64 = ordered.legs.iter().map(|leg| leg.distance_meters).sum();
        let seconds: f64 = ordered.legs.iter().map(|leg| leg.duration_seconds).sum();
        let total_distance = meters * METERS_TO_MILES;
        let total_duration = (seconds / 60.0).round() as i64;

        debug!(
            route_number,
            stops = ordered_addresses.len(),
            miles = total_distance,
            minutes = total_duration,
            "sequenced route"
        );

        Ok(Route {
            route_number,
            maps_link: maps_link(
                &origin.address,
                &destination.address,
                &ordered_waypoints,
                self.travel_mode(),
            ),
            efficiency: efficiency(ordered_addresses.len(), total_distance),
            ordered_addresses,
            total_distance,
            total_duration,
        })
    }
}

fn check_permutation(ordered: &OrderedRoute, waypoint_count: usize) -> Result<(), SequencingError> {
    if ordered.waypoint_order.len() != waypoint_count {
        return Err(SequencingError::MalformedResponse(format!(
            "waypoint order has {} entries for {} waypoints",
            ordered.waypoint_order.len(),
            waypoint_count
        )));
    }

    let mut seen = vec![false; waypoint_count];
    for &index in &ordered.waypoint_order {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(SequencingError::MalformedResponse(format!(
                    "waypoint order is not a permutation: index {}",
                    index
                )));
            }
        }
    }

    Ok(())
}
