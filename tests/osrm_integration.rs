//! OSRM trip ordering against a real routing container.
//!
//! Prepares a Missouri foot-profile dataset on first run (large download),
//! then serves it with `osrm-routed` via testcontainers.

#[allow(dead_code)]
mod fixtures;

use std::env;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use canvass_planner::osrm::{OsrmClient, OsrmConfig};
use canvass_planner::osrm_data::{GeofabrikRegion, OsrmDataset, OsrmDatasetConfig, OsrmProfile};
use canvass_planner::planner::{PlannerOptions, RoutePlanner};
use canvass_planner::sequencer::Sequencer;
use canvass_planner::traits::{GeoPoint, TravelMode};

use fixtures::{OLD_TOWN, SOUTH_PARKWAY, addresses, geocoder};

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_root = env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string());
    let region = GeofabrikRegion::new("north-america/us/missouri");
    let config = OsrmDatasetConfig::new(region, data_root, OsrmProfile::Foot);
    let dataset = OsrmDataset::ensure(&config)
        .map_err(|err| TestcontainersError::other(format!("OSRM prep failed: {}", err)))?;
    let mtime = std::fs::metadata(dataset.osrm_base.with_extension("osrm.partition"))
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|time| time.duration_since(std::time::SystemTime::UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs())
        .unwrap_or(0);
    let container_name = format!("osrm-missouri-foot-{}", mtime);

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            dataset.data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            dataset.container_path(),
        ])
        .with_container_name(container_name)
        .with_startup_timeout(std::time::Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn client(base_url: &str) -> OsrmClient {
    OsrmClient::new(OsrmConfig {
        base_url: base_url.to_string(),
        profile: OsrmProfile::Foot.name().to_string(),
        timeout_secs: 15,
    })
    .expect("build OSRM client")
}

#[test]
fn test_osrm_trip_orders_waypoints() {
    let (container, base_url) = osrm_container().expect("start OSRM container");
    let client = client(&base_url);
    let sequencer = Sequencer::new(&client, TravelMode::Walking);

    let group: Vec<GeoPoint> = OLD_TOWN[..6]
        .iter()
        .map(|h| GeoPoint::new(h.address, h.lat, h.lng))
        .collect();

    // The router may still be loading the dataset right after start.
    let route = {
        let start = std::time::Instant::now();
        loop {
            match sequencer.sequence(1, &group) {
                Ok(route) => break route,
                Err(err) if start.elapsed() < std::time::Duration::from_secs(15) => {
                    eprintln!("OSRM not ready: {}", err);
                    std::thread::sleep(std::time::Duration::from_millis(500));
                }
                Err(err) => panic!("OSRM trip failed: {}", err),
            }
        }
    };

    assert_eq!(route.ordered_addresses.len(), group.len());
    assert_eq!(route.ordered_addresses[0], group[0].address);
    assert_eq!(route.ordered_addresses[5], group[5].address);
    assert!(route.total_distance > 0.0);
    assert!(route.total_duration > 0);
    assert!(route.efficiency.is_finite());

    drop(container);
}

#[test]
fn test_osrm_backed_plan_covers_every_address() {
    let (container, base_url) = osrm_container().expect("start OSRM container");

    let households: Vec<_> = OLD_TOWN.iter().chain(SOUTH_PARKWAY).copied().collect();
    let input = addresses(&households);
    let options = PlannerOptions {
        max_group_size: 8,
        max_concurrency: 2,
        seed: Some(17),
        ..PlannerOptions::default()
    };
    let planner = RoutePlanner::new(geocoder(&households), client(&base_url), options)
        .expect("build planner");

    let report = planner.plan(&input).expect("plan routes");

    let routed: usize = report.routes.iter().map(|r| r.stop_count()).sum();
    let skipped: usize = report.skipped.iter().map(|s| s.stops).sum();
    assert_eq!(routed + skipped, input.len());
    assert!(report.routes.iter().all(|r| r.stop_count() <= 8));
    assert!(report.total_distance > 0.0);

    drop(container);
}
