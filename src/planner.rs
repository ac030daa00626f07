//! Batch route planning.
//!
//! Addresses are geocoded, clustered, split to capacity, sequenced group by
//! group on a bounded worker pool, and aggregated into a report. Per-address
//! and per-group failures degrade the result instead of aborting the run.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::capacity::{chunk, cluster_count, group_points};
use crate::error::{GroupFailure, PlanError};
use crate::geocode::resolve;
use crate::rate_limit::{RateLimiter, Throttled};
use crate::report::{OptimizationReport, aggregate};
use crate::sequencer::{Route, Sequencer};
use crate::traits::{Address, GeoPoint, Geocoder, RouteOrderer, TravelMode};

#[derive(Debug, Clone)]
pub struct PlannerOptions {
    /// Stops per route including start and end.
    pub max_group_size: usize,
    /// Worker threads for geocoding and sequencing.
    pub max_concurrency: usize,
    /// Minimum spacing between calls to the same provider.
    pub min_request_interval: Duration,
    /// Seed for centroid initialisation. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Travel mode for map links when the route orderer does not report one.
    pub travel_mode: TravelMode,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            max_group_size: 25,
            max_concurrency: 4,
            min_request_interval: Duration::ZERO,
            seed: None,
            travel_mode: TravelMode::Walking,
        }
    }
}

pub struct RoutePlanner<G, O> {
    geocoder: G,
    orderer: O,
    options: PlannerOptions,
    geocode_limiter: RateLimiter,
    route_limiter: RateLimiter,
    pool: rayon::ThreadPool,
}

impl<G, O> RoutePlanner<G, O>
where
    G: Geocoder,
    O: RouteOrderer,
{
    pub fn new(geocoder: G, orderer: O, options: PlannerOptions) -> Result<Self, PlanError> {
        if options.max_group_size < 2 {
            return Err(PlanError::InvalidInput(format!(
                "max group size must be at least 2, got {}",
                options.max_group_size
            )));
        }
        if let Some(ceiling) = orderer.max_waypoints() {
            if options.max_group_size - 2 > ceiling {
                return Err(PlanError::InvalidInput(format!(
                    "max group size {} exceeds the provider limit of {} waypoints plus start and end",
                    options.max_group_size, ceiling
                )));
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.max_concurrency.max(1))
            .thread_name(|index| format!("canvass-planner-{}", index))
            .build()?;

        Ok(Self {
            geocoder,
            orderer,
            geocode_limiter: RateLimiter::new(options.min_request_interval),
            route_limiter: RateLimiter::new(options.min_request_interval),
            options,
            pool,
        })
    }

    /// Plan canvassing routes for `addresses`.
    pub fn plan(&self, addresses: &[Address]) -> Result<OptimizationReport, PlanError> {
        if addresses.len() < 2 {
            return Err(PlanError::InvalidInput(
                "need at least 2 addresses to create a route".to_string(),
            ));
        }

        let groups = self.group(addresses);
        info!(
            addresses = addresses.len(),
            groups = groups.len(),
            "optimizing addresses into routes"
        );

        let results = self.sequence_all(&groups);
        aggregate(results, addresses.len(), self.options.max_group_size)
    }

    /// Capacity-bounded groups in route-number order.
    pub fn group(&self, addresses: &[Address]) -> Vec<Vec<GeoPoint>> {
        let max = self.options.max_group_size;

        if addresses.len() <= max && !self.orderer.requires_coordinates() {
            return vec![addresses.iter().map(GeoPoint::unresolved).collect()];
        }

        let points = self.resolve_all(addresses);
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        debug!(
            clusters = cluster_count(points.len(), max),
            "clustering geocoded addresses"
        );
        match group_points(points.clone(), max, &mut rng) {
            Ok(groups) => groups,
            Err(err) => {
                warn!(error = %err, "geographic grouping failed, chunking in input order");
                chunk(&points, max)
            }
        }
    }

    /// Geocode on the worker pool; output order matches `addresses`.
    pub fn resolve_all(&self, addresses: &[Address]) -> Vec<GeoPoint> {
        let geocoder = Throttled::new(&self.geocoder, &self.geocode_limiter);
        self.pool.install(|| {
            addresses
                .par_iter()
                .map(|address| resolve(&geocoder, address))
                .collect()
        })
    }

    fn sequence_all(&self, groups: &[Vec<GeoPoint>]) -> Vec<Result<Route, GroupFailure>> {
        let orderer = Throttled::new(&self.orderer, &self.route_limiter);
        let sequencer = Sequencer::new(&orderer, self.options.travel_mode);

        self.pool.install(|| {
            groups
                .par_iter()
                .enumerate()
                .map(|(index, group)| {
                    let route_number = index + 1;
                    sequencer
                        .sequence(route_number, group)
                        .map_err(|error| GroupFailure {
                            route_number,
                            stops: group.len(),
                            error,
                        })
                })
                .collect()
        })
    }
}
