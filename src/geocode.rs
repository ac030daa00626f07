//! Address resolution with sentinel fallback.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::GeocodeError;
use crate::traits::{GeoPoint, Geocoder};

/// Resolve one address. Any geocoder failure yields the sentinel (0, 0)
/// point rather than an error; no retry is attempted.
pub fn resolve<G: Geocoder + ?Sized>(geocoder: &G, address: &str) -> GeoPoint {
    match geocoder.geocode(address) {
        Ok((lat, lng)) => {
            debug!(address, lat, lng, "geocoded address");
            GeoPoint::new(address, lat, lng)
        }
        Err(err) => {
            warn!(address, error = %err, "geocoding degraded, using sentinel coordinates");
            GeoPoint::unresolved(address)
        }
    }
}

/// In-memory geocoder backed by a fixed address table.
///
/// Useful offline and in tests; unknown addresses report no results.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    table: HashMap<String, (f64, f64)>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: impl Into<String>, location: (f64, f64)) {
        self.table.insert(address.into(), location);
    }
}

impl<A: Into<String>> FromIterator<(A, (f64, f64))> for StaticGeocoder {
    fn from_iter<I: IntoIterator<Item = (A, (f64, f64))>>(iter: I) -> Self {
        Self {
            table: iter
                .into_iter()
                .map(|(address, location)| (address.into(), location))
                .collect(),
        }
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodeError> {
        self.table.get(address).copied().ok_or(GeocodeError::NoResults)
    }
}
