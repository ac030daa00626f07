//! OSRM dataset preparation (Geofabrik download + docker preprocessing).
//!
//! Builds an MLD dataset for one routing profile so a local `osrm-routed`
//! can serve trip requests. Each profile gets its own directory because the
//! extracted graph depends on the profile's lua script.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "north-america/us/missouri".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> &str {
        self.path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

/// Routing profile bundled with the OSRM image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OsrmProfile {
    #[default]
    Foot,
    Car,
}

impl OsrmProfile {
    /// Name used in `/trip/v1/{profile}` URLs.
    pub fn name(&self) -> &'static str {
        match self {
            OsrmProfile::Foot => "foot",
            OsrmProfile::Car => "car",
        }
    }

    fn script(&self) -> &'static str {
        match self {
            OsrmProfile::Foot => "/opt/foot.lua",
            OsrmProfile::Car => "/opt/car.lua",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    pub profile: OsrmProfile,
}

impl OsrmDatasetConfig {
    pub fn new(
        region: GeofabrikRegion,
        data_root: impl Into<PathBuf>,
        profile: OsrmProfile,
    ) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
    pub profile: OsrmProfile,
}

impl OsrmDataset {
    /// Name of the `.osrm` file as seen from inside the container's `/data` mount.
    pub fn container_path(&self) -> String {
        format!("/data/{}", file_name(&self.osrm_base))
    }
}

#[derive(Debug)]
pub enum OsrmDataError {
    Io(io::Error),
    Http(reqwest::Error),
    ProcessFailure(String),
}

impl fmt::Display for OsrmDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsrmDataError::Io(err) => write!(f, "I/O error: {}", err),
            OsrmDataError::Http(err) => write!(f, "download failed: {}", err),
            OsrmDataError::ProcessFailure(msg) => write!(f, "preprocessing failed: {}", msg),
        }
    }
}

impl std::error::Error for OsrmDataError {}

impl From<io::Error> for OsrmDataError {
    fn from(err: io::Error) -> Self {
        OsrmDataError::Io(err)
    }
}

impl From<reqwest::Error> for OsrmDataError {
    fn from(err: reqwest::Error) -> Self {
        OsrmDataError::Http(err)
    }
}

impl OsrmDataset {
    /// Download and preprocess whatever is missing; existing files are reused.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let region_name = config.region.name();
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let data_dir = data_root.join(format!("{}-{}", region_name, config.profile.name()));
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region_name));
        if !pbf_path.exists() {
            info!(url = %config.region.url(), "downloading OSM extract");
            download_pbf(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", region_name));
        if !osrm_base.exists() {
            info!(profile = config.profile.name(), "extracting road graph");
            run_docker(
                &[
                    "osrm-extract",
                    "-p",
                    config.profile.script(),
                    &format!("/data/{}", file_name(&pbf_path)),
                ],
                &data_dir,
            )?;
        }

        if !mld_ready(&osrm_base) {
            info!("partitioning and customizing graph");
            let target = format!("/data/{}", file_name(&osrm_base));
            run_docker(&["osrm-partition", &target], &data_dir)?;
            run_docker(&["osrm-customize", &target], &data_dir)?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
            profile: config.profile,
        })
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let mut response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    response.copy_to(&mut writer)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|extension| osrm_base.with_extension(extension).exists())
        && osrm_base.exists()
}

fn run_docker(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::ProcessFailure(format!(
            "docker {} exited with status {}",
            args.first().copied().unwrap_or_default(),
            status
        )))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
