//! Google Maps HTTP adapter for geocoding and waypoint ordering.

use serde::Deserialize;

use crate::error::{ConfigError, GeocodeError, SequencingError};
use crate::traits::{GeoPoint, Geocoder, Leg, OrderedRoute, RouteOrderer, TravelMode};

/// Waypoints the directions API accepts besides origin and destination.
pub const MAX_WAYPOINTS: usize = 23;

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    pub api_key: String,
    pub base_url: String,
    pub travel_mode: TravelMode,
    pub timeout_secs: u64,
}

impl GoogleMapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://maps.googleapis.com".to_string(),
            travel_mode: TravelMode::Walking,
            timeout_secs: 15,
        }
    }

    /// Read the API key from `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(API_KEY_VAR))?;

        Ok(Self::new(api_key))
    }
}

#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodeError> {
        let url = format!("{}/maps/api/geocode/json", self.config.base_url);
        let body = self
            .client
            .get(url)
            .query(&[("address", address), ("key", self.config.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json::<GeocodeResponse>()?;

        location_from_geocode(body)
    }
}

impl RouteOrderer for GoogleMapsClient {
    fn order(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<OrderedRoute, SequencingError> {
        let url = format!("{}/maps/api/directions/json", self.config.base_url);
        let mut params = vec![
            ("origin", origin.address.clone()),
            ("destination", destination.address.clone()),
            ("mode", self.config.travel_mode.as_str().to_string()),
            ("key", self.config.api_key.clone()),
        ];
        if !waypoints.is_empty() {
            let stops = waypoints
                .iter()
                .map(|waypoint| waypoint.address.as_str())
                .collect::<Vec<_>>()
                .join("|");
            params.push(("waypoints", format!("optimize:true|{}", stops)));
        }

        let body = self
            .client
            .get(url)
            .query(&params)
            .send()?
            .error_for_status()?
            .json::<DirectionsResponse>()?;

        route_from_directions(body)
    }

    fn max_waypoints(&self) -> Option<usize> {
        Some(MAX_WAYPOINTS)
    }

    fn travel_mode(&self) -> Option<TravelMode> {
        Some(self.config.travel_mode)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    waypoint_order: Vec<usize>,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

fn location_from_geocode(body: GeocodeResponse) -> Result<(f64, f64), GeocodeError> {
    if body.status != "OK" {
        return Err(GeocodeError::Status {
            status: body.status,
            message: body.error_message,
        });
    }

    body.results
        .first()
        .map(|result| (result.geometry.location.lat, result.geometry.location.lng))
        .ok_or(GeocodeError::NoResults)
}

fn route_from_directions(body: DirectionsResponse) -> Result<OrderedRoute, SequencingError> {
    if body.status != "OK" {
        return Err(SequencingError::ProviderStatus {
            status: body.status,
            message: body.error_message,
        });
    }

    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| SequencingError::MalformedResponse("no routes in response".to_string()))?;

    Ok(OrderedRoute {
        waypoint_order: route.waypoint_order,
        legs: route
            .legs
            .into_iter()
            .map(|leg| Leg {
                distance_meters: leg.distance.value,
                duration_seconds: leg.duration.value,
            })
            .collect(),
    })
}
