//! Capacity-bounded route groups.
//!
//! Turns clusters into groups no larger than the per-route capacity, and
//! provides the geography-blind chunking used when clustering is not
//! possible.

use rand::Rng;

use crate::cluster::cluster;
use crate::error::GroupingError;
use crate::traits::GeoPoint;

/// Number of clusters needed for `total` items at `max_group_size` per group.
pub fn cluster_count(total: usize, max_group_size: usize) -> usize {
    total.div_ceil(max_group_size.max(1))
}

/// Split clusters so that no group exceeds `max_group_size`.
///
/// Empty clusters are dropped. Oversized clusters are cut into contiguous
/// slices in their existing member order; the last slice may be shorter.
pub fn enforce<T>(clusters: Vec<Vec<T>>, max_group_size: usize) -> Vec<Vec<T>> {
    let max_group_size = max_group_size.max(1);
    let mut groups = Vec::with_capacity(clusters.len());

    for members in clusters {
        if members.is_empty() {
            continue;
        }
        if members.len() <= max_group_size {
            groups.push(members);
            continue;
        }

        let mut members = members.into_iter().peekable();
        while members.peek().is_some() {
            groups.push(members.by_ref().take(max_group_size).collect());
        }
    }

    groups
}

/// Contiguous fixed-size chunks of `items`, ignoring geography.
pub fn chunk<T: Clone>(items: &[T], max_group_size: usize) -> Vec<Vec<T>> {
    items
        .chunks(max_group_size.max(1))
        .map(|slice| slice.to_vec())
        .collect()
}

/// Cluster geocoded points and bound every group by `max_group_size`.
pub fn group_points<R: Rng + ?Sized>(
    points: Vec<GeoPoint>,
    max_group_size: usize,
    rng: &mut R,
) -> Result<Vec<Vec<GeoPoint>>, GroupingError> {
    if max_group_size == 0 {
        return Err(GroupingError::ZeroCapacity);
    }
    if let Some(point) = points
        .iter()
        .find(|p| !p.latitude.is_finite() || !p.longitude.is_finite())
    {
        return Err(GroupingError::NonFiniteCoordinate {
            address: point.address.clone(),
        });
    }
    if !points.is_empty() && points.iter().all(GeoPoint::is_unresolved) {
        return Err(GroupingError::NoResolvedPoints);
    }

    let k = cluster_count(points.len(), max_group_size);
    let clusters = cluster(points, k, rng);
    Ok(enforce(clusters, max_group_size))
}
