//! Haversine distance and a straight-line route orderer.
//!
//! The orderer is the fallback when no directions service is available: it
//! ignores the street network but never fails.

use crate::error::SequencingError;
use crate::traits::{GeoPoint, Leg, OrderedRoute, RouteOrderer};

/// Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

const METERS_PER_MILE: f64 = 1609.344;

/// Average walking speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 5.0;

/// Great-circle distance between two (lat, lng) points in miles.
pub fn haversine_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Nearest-neighbour orderer over straight-line distances.
///
/// Starting from the origin, repeatedly visits the closest unvisited
/// waypoint, then finishes at the destination.
#[derive(Debug, Clone)]
pub struct HaversineOrderer {
    /// Assumed average travel speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineOrderer {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineOrderer {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> Leg {
        let meters = haversine_miles(from, to) * METERS_PER_MILE;
        let hours = (meters / 1000.0) / self.speed_kmh;
        Leg {
            distance_meters: meters,
            duration_seconds: hours * 3600.0,
        }
    }
}

impl RouteOrderer for HaversineOrderer {
    fn order(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<OrderedRoute, SequencingError> {
        let mut remaining: Vec<usize> = (0..waypoints.len()).collect();
        let mut waypoint_order = Vec::with_capacity(waypoints.len());
        let mut legs = Vec::with_capacity(waypoints.len() + 1);
        let mut current = origin.location();

        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (slot, &index) in remaining.iter().enumerate() {
                let distance = haversine_miles(current, waypoints[index].location());
                if distance < best_distance {
                    best_distance = distance;
                    best = slot;
                }
            }

            let next = remaining.remove(best);
            let location = waypoints[next].location();
            legs.push(self.leg(current, location));
            waypoint_order.push(next);
            current = location;
        }

        legs.push(self.leg(current, destination.location()));

        Ok(OrderedRoute {
            waypoint_order,
            legs,
        })
    }

    fn requires_coordinates(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_miles((38.81, -90.85), (38.81, -90.85));
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // St. Louis (38.627, -90.199) to Kansas City (39.100, -94.578)
        // Actual distance ~238 miles
        let dist = haversine_miles((38.627, -90.199), (39.100, -94.578));
        assert!(dist > 225.0 && dist < 250.0, "STL to KC should be ~238mi, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = (38.8114, -90.8529);
        let b = (38.7895, -90.8120);
        assert_eq!(haversine_miles(a, b), haversine_miles(b, a));
    }

    #[test]
    fn test_nearest_neighbour_order() {
        let orderer = HaversineOrderer::default();
        let origin = GeoPoint::new("origin", 38.80, -90.80);
        let destination = GeoPoint::new("destination", 38.80, -90.70);
        let waypoints = vec![
            GeoPoint::new("far", 38.80, -90.74),
            GeoPoint::new("near", 38.80, -90.79),
            GeoPoint::new("middle", 38.80, -90.76),
        ];

        let route = orderer.order(&origin, &destination, &waypoints).unwrap();

        assert_eq!(route.waypoint_order, vec![1, 2, 0]);
        assert_eq!(route.legs.len(), 4);
    }

    #[test]
    fn test_leg_duration_uses_speed() {
        let orderer = HaversineOrderer::new(5.0);
        let leg = orderer.leg((38.80, -90.80), (38.80, -90.80));
        assert_eq!(leg.distance_meters, 0.0);
        assert_eq!(leg.duration_seconds, 0.0);

        // 1 degree of latitude is ~69.1 miles, ~111.2 km
        let leg = orderer.leg((38.0, -90.0), (39.0, -90.0));
        let hours = leg.duration_seconds / 3600.0;
        assert!((hours - leg.distance_meters / 1000.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_waypoints_single_leg() {
        let orderer = HaversineOrderer::default();
        let origin = GeoPoint::new("a", 38.80, -90.80);
        let destination = GeoPoint::new("b", 38.81, -90.80);
        let route = orderer.order(&origin, &destination, &[]).unwrap();
        assert!(route.waypoint_order.is_empty());
        assert_eq!(route.legs.len(), 1);
    }
}
