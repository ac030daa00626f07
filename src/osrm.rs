//! OSRM HTTP adapter for waypoint ordering via the trip service.

use serde::Deserialize;

use crate::error::SequencingError;
use crate::traits::{GeoPoint, Leg, OrderedRoute, RouteOrderer, TravelMode};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "foot".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteOrderer for OsrmClient {
    fn order(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<OrderedRoute, SequencingError> {
        let coords = std::iter::once(origin)
            .chain(waypoints)
            .chain(std::iter::once(destination))
            .map(|point| format!("{:.6},{:.6}", point.longitude, point.latitude))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!(
            "{}/trip/v1/{}/{}?source=first&destination=last&roundtrip=false&overview=false",
            self.config.base_url, self.config.profile, coords
        );

        let response = self.client.get(url).send()?;
        let status = response.status();

        // Errors come back as JSON with a non-2xx status and a `code` field.
        match response.json::<OsrmTripResponse>() {
            Ok(body) => route_from_trip(body, waypoints.len()),
            Err(_) if !status.is_success() => Err(SequencingError::ProviderStatus {
                status: status.as_u16().to_string(),
                message: status.canonical_reason().map(str::to_string),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn requires_coordinates(&self) -> bool {
        true
    }

    fn travel_mode(&self) -> Option<TravelMode> {
        match self.config.profile.as_str() {
            "foot" | "walking" => Some(TravelMode::Walking),
            "bicycle" | "cycling" => Some(TravelMode::Bicycling),
            "car" | "driving" => Some(TravelMode::Driving),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTripResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    waypoints: Vec<OsrmTripWaypoint>,
    #[serde(default)]
    trips: Vec<OsrmTrip>,
}

#[derive(Debug, Deserialize)]
struct OsrmTripWaypoint {
    /// Position of this input coordinate within the trip.
    waypoint_index: usize,
}

#[derive(Debug, Deserialize)]
struct OsrmTrip {
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}

/// The trip lists waypoints in input order (origin, waypoints.., destination),
/// each tagged with its visiting position.
fn route_from_trip(
    body: OsrmTripResponse,
    waypoint_count: usize,
) -> Result<OrderedRoute, SequencingError> {
    if body.code != "Ok" {
        return Err(SequencingError::ProviderStatus {
            status: body.code,
            message: body.message,
        });
    }

    if body.waypoints.len() != waypoint_count + 2 {
        return Err(SequencingError::MalformedResponse(format!(
            "trip has {} waypoints, expected {}",
            body.waypoints.len(),
            waypoint_count + 2
        )));
    }

    let trip = body
        .trips
        .into_iter()
        .next()
        .ok_or_else(|| SequencingError::MalformedResponse("no trips in response".to_string()))?;

    let mut intermediate: Vec<(usize, usize)> = body.waypoints[1..=waypoint_count]
        .iter()
        .enumerate()
        .map(|(index, waypoint)| (waypoint.waypoint_index, index))
        .collect();
    intermediate.sort_unstable();

    Ok(OrderedRoute {
        waypoint_order: intermediate.into_iter().map(|(_, index)| index).collect(),
        legs: trip
            .legs
            .into_iter()
            .map(|leg| Leg {
                distance_meters: leg.distance,
                duration_seconds: leg.duration,
            })
            .collect(),
    })
}
