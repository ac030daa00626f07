//! Core domain types and collaborator traits for the canvass planner.
//!
//! External services (geocoding, route ordering) sit behind these traits and
//! are handed to the planner explicitly. Implementations must be shareable
//! across worker threads.

use serde::Serialize;

use crate::error::{GeocodeError, SequencingError};

/// Free-text street address, the unit of work.
pub type Address = String;

/// An address with the coordinates it resolved to.
///
/// Addresses that could not be geocoded keep the sentinel `(0.0, 0.0)` so
/// that no stop is dropped from a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub address: Address,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(address: impl Into<Address>, latitude: f64, longitude: f64) -> Self {
        Self {
            address: address.into(),
            latitude,
            longitude,
        }
    }

    /// A point carrying the sentinel coordinates.
    pub fn unresolved(address: impl Into<Address>) -> Self {
        Self::new(address, 0.0, 0.0)
    }

    /// Location coordinates (lat, lng).
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn is_unresolved(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// How the canvasser moves between stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Bicycling,
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Driving => "driving",
        }
    }
}

/// Resolves an address into coordinates (lat, lng).
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodeError>;
}

/// One leg between consecutive stops of an ordered route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Provider answer for one route group.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedRoute {
    /// Visiting order as indices into the waypoints that were sent.
    pub waypoint_order: Vec<usize>,
    pub legs: Vec<Leg>,
}

/// Orders the waypoints of a group between a fixed origin and destination.
pub trait RouteOrderer: Send + Sync {
    fn order(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<OrderedRoute, SequencingError>;

    /// Largest number of waypoints the provider accepts besides origin and
    /// destination, if it has a ceiling.
    fn max_waypoints(&self) -> Option<usize> {
        None
    }

    /// Whether the provider routes by coordinates rather than address text.
    fn requires_coordinates(&self) -> bool {
        false
    }

    /// Mode the provider routes for, when it is fixed by its configuration.
    fn travel_mode(&self) -> Option<TravelMode> {
        None
    }
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodeError> {
        (**self).geocode(address)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for Box<T> {
    fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodeError> {
        (**self).geocode(address)
    }
}

impl<T: RouteOrderer + ?Sized> RouteOrderer for &T {
    fn order(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<OrderedRoute, SequencingError> {
        (**self).order(origin, destination, waypoints)
    }

    fn max_waypoints(&self) -> Option<usize> {
        (**self).max_waypoints()
    }

    fn requires_coordinates(&self) -> bool {
        (**self).requires_coordinates()
    }

    fn travel_mode(&self) -> Option<TravelMode> {
        (**self).travel_mode()
    }
}

impl<T: RouteOrderer + ?Sized> RouteOrderer for Box<T> {
    fn order(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<OrderedRoute, SequencingError> {
        (**self).order(origin, destination, waypoints)
    }

    fn max_waypoints(&self) -> Option<usize> {
        (**self).max_waypoints()
    }

    fn requires_coordinates(&self) -> bool {
        (**self).requires_coordinates()
    }

    fn travel_mode(&self) -> Option<TravelMode> {
        (**self).travel_mode()
    }
}
