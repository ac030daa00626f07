//! Spatial clustering of geocoded stops.
//!
//! K-means over latitude/longitude with haversine assignment. Centroids are
//! seeded from k randomly sampled distinct locations; callers that need reproducible
//! output pass a seeded RNG or explicit initial centroids.

use rand::Rng;

use crate::haversine::haversine_miles;
use crate::traits::GeoPoint;

/// Iteration budget for centroid refinement.
pub const MAX_ITERATIONS: usize = 100;

/// A centroid has moved when either axis shifts by more than this many degrees.
pub const CONVERGENCE_THRESHOLD_DEGREES: f64 = 0.0001;

/// Result of a k-means run.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Non-empty clusters in centroid-index order. Members keep input order.
    pub clusters: Vec<Vec<GeoPoint>>,
    /// Refinement passes that moved at least one centroid.
    pub iterations: usize,
    /// False when the iteration budget ran out first.
    pub converged: bool,
}

/// Partition `points` into at most `k` geographic clusters.
///
/// With no more points than clusters every point becomes its own group.
pub fn cluster<R: Rng + ?Sized>(
    points: Vec<GeoPoint>,
    k: usize,
    rng: &mut R,
) -> Vec<Vec<GeoPoint>> {
    let k = k.max(1);
    if points.len() <= k {
        return points.into_iter().map(|point| vec![point]).collect();
    }

    let mut locations: Vec<(f64, f64)> = Vec::new();
    for point in &points {
        let location = point.location();
        if !locations.contains(&location) {
            locations.push(location);
        }
    }

    // Seeds are distinct locations; with fewer locations than k each one seeds a cluster.
    let centroids = if locations.len() <= k {
        locations
    } else {
        rand::seq::index::sample(rng, locations.len(), k)
            .into_iter()
            .map(|i| locations[i])
            .collect()
    };

    kmeans(points, centroids).clusters
}

/// Run k-means from the given initial centroids (lat, lng).
pub fn kmeans(points: Vec<GeoPoint>, mut centroids: Vec<(f64, f64)>) -> Clustering {
    if centroids.is_empty() {
        let clusters = if points.is_empty() { Vec::new() } else { vec![points] };
        return Clustering {
            clusters,
            iterations: 0,
            converged: true,
        };
    }

    let mut assignment = vec![0usize; points.len()];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_ITERATIONS {
        for (slot, point) in assignment.iter_mut().zip(&points) {
            *slot = nearest_centroid(point.location(), &centroids);
        }

        let mut moved = false;
        for (index, centroid) in centroids.iter_mut().enumerate() {
            let Some((lat, lng)) = member_mean(&points, &assignment, index) else {
                continue;
            };
            if (centroid.0 - lat).abs() > CONVERGENCE_THRESHOLD_DEGREES
                || (centroid.1 - lng).abs() > CONVERGENCE_THRESHOLD_DEGREES
            {
                *centroid = (lat, lng);
                moved = true;
            }
        }

        if !moved {
            converged = true;
            break;
        }

        iterations += 1;
    }

    let mut clusters: Vec<Vec<GeoPoint>> = vec![Vec::new(); centroids.len()];
    for (point, index) in points.into_iter().zip(assignment) {
        clusters[index].push(point);
    }
    clusters.retain(|members| !members.is_empty());

    Clustering {
        clusters,
        iterations,
        converged,
    }
}

/// Index of the closest centroid; the first one wins ties.
fn nearest_centroid(location: (f64, f64), centroids: &[(f64, f64)]) -> usize {
    let mut nearest = 0;
    let mut min_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = haversine_miles(location, *centroid);
        if distance < min_distance {
            min_distance = distance;
            nearest = index;
        }
    }
    nearest
}

fn member_mean(points: &[GeoPoint], assignment: &[usize], index: usize) -> Option<(f64, f64)> {
    let mut count = 0usize;
    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;
    for (point, _) in points
        .iter()
        .zip(assignment)
        .filter(|(_, assigned)| **assigned == index)
    {
        count += 1;
        lat_sum += point.latitude;
        lng_sum += point.longitude;
    }

    if count == 0 {
        None
    } else {
        Some((lat_sum / count as f64, lng_sum / count as f64))
    }
}
