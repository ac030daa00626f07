//! Fleet-level aggregation of sequenced routes.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{GroupFailure, PlanError};
use crate::sequencer::{MIN_DISTANCE_MILES, Route, SHORT_ROUTE_EFFICIENCY_FACTOR};

/// A group left out of the report, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedGroup {
    pub route_number: usize,
    pub stops: usize,
    pub reason: String,
}

/// Outcome of a planning run. Holds at least one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    /// Successful routes ordered by route number.
    pub routes: Vec<Route>,
    pub total_routes: usize,
    pub total_addresses: usize,
    pub max_addresses_per_route: usize,
    /// Miles.
    pub total_distance: f64,
    /// Minutes.
    pub total_duration: i64,
    pub average_houses_per_mile: f64,
    pub average_distance_per_route: f64,
    pub average_houses_per_route: f64,
    pub skipped: Vec<SkippedGroup>,
}

/// Combine per-group outcomes into a report.
///
/// Failed groups are listed under `skipped` and never retried. With no
/// successful group the whole run is a [`PlanError::BatchFailure`].
pub fn aggregate(
    results: Vec<Result<Route, GroupFailure>>,
    total_addresses: usize,
    max_addresses_per_route: usize,
) -> Result<OptimizationReport, PlanError> {
    let groups = results.len();
    let mut routes = Vec::with_capacity(groups);
    let mut skipped = Vec::new();

    for result in results {
        match result {
            Ok(route) => routes.push(route),
            Err(failure) => {
                warn!(
                    route_number = failure.route_number,
                    stops = failure.stops,
                    error = %failure.error,
                    "skipping route group"
                );
                skipped.push(SkippedGroup {
                    route_number: failure.route_number,
                    stops: failure.stops,
                    reason: failure.error.to_string(),
                });
            }
        }
    }

    if routes.is_empty() {
        return Err(PlanError::BatchFailure { groups });
    }

    routes.sort_by_key(|route| route.route_number);

    let total_distance: f64 = routes.iter().map(|route| route.total_distance).sum();
    let total_duration: i64 = routes.iter().map(|route| route.total_duration).sum();
    let route_count = routes.len() as f64;
    let addresses = total_addresses as f64;

    let average_houses_per_mile = if total_distance < MIN_DISTANCE_MILES {
        addresses * SHORT_ROUTE_EFFICIENCY_FACTOR
    } else {
        addresses / total_distance
    };

    info!(
        routes = routes.len(),
        skipped = skipped.len(),
        miles = total_distance,
        minutes = total_duration,
        "aggregated routes"
    );

    Ok(OptimizationReport {
        total_routes: routes.len(),
        total_addresses,
        max_addresses_per_route,
        total_distance,
        total_duration,
        average_houses_per_mile,
        average_distance_per_route: total_distance / route_count,
        average_houses_per_route: addresses / route_count,
        routes,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SequencingError;

    fn route(number: usize, stops: usize, miles: f64, minutes: i64) -> Route {
        Route {
            route_number: number,
            ordered_addresses: (0..stops).map(|i| format!("{} Elm St", i)).collect(),
            maps_link: String::new(),
            total_distance: miles,
            total_duration: minutes,
            efficiency: crate::sequencer::efficiency(stops, miles),
        }
    }

    fn failure(number: usize) -> GroupFailure {
        GroupFailure {
            route_number: number,
            stops: 4,
            error: SequencingError::ProviderStatus {
                status: "NOT_FOUND".to_string(),
                message: None,
            },
        }
    }

    #[test]
    fn test_all_failed_is_batch_failure() {
        let err = aggregate(vec![Err(failure(1)), Err(failure(2))], 8, 4).unwrap_err();
        assert!(matches!(err, PlanError::BatchFailure { groups: 2 }));
    }

    #[test]
    fn test_empty_results_is_batch_failure() {
        assert!(matches!(
            aggregate(Vec::new(), 0, 4),
            Err(PlanError::BatchFailure { groups: 0 })
        ));
    }

    #[test]
    fn test_metrics() {
        let results = vec![Ok(route(1, 4, 1.5, 30)), Err(failure(2)), Ok(route(3, 2, 0.5, 10))];
        let report = aggregate(results, 10, 4).unwrap();

        assert_eq!(report.total_routes, 2);
        assert_eq!(report.total_distance, 2.0);
        assert_eq!(report.total_duration, 40);
        assert_eq!(report.average_houses_per_mile, 5.0);
        assert_eq!(report.average_distance_per_route, 1.0);
        assert_eq!(report.average_houses_per_route, 5.0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].route_number, 2);
        assert!(report.skipped[0].reason.contains("NOT_FOUND"));
    }

    #[test]
    fn test_routes_sorted_by_number() {
        let results = vec![Ok(route(2, 3, 1.0, 5)), Ok(route(1, 3, 1.0, 5))];
        let report = aggregate(results, 6, 3).unwrap();
        let numbers: Vec<usize> = report.routes.iter().map(|r| r.route_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_zero_distance_fleet_is_guarded() {
        let report = aggregate(vec![Ok(route(1, 3, 0.0, 0))], 3, 25).unwrap();
        assert_eq!(report.average_houses_per_mile, 3000.0);
        assert!(report.average_houses_per_mile.is_finite());
    }
}
