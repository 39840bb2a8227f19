use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::camera::CameraStore;
use crate::config::LauncherConfig;
use crate::host::Host;
use crate::runtime::platform::runtime_asset_name;
use crate::runtime::{runtime_path, sha256_file};

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub platform: String,
    /// Release asset for this platform, if a prebuilt runtime exists.
    pub runtime_asset: Option<String>,
    pub runtime_path: String,
    pub runtime_installed: bool,
    pub runtime_digest: Option<String>,
    pub update_checks_enabled: bool,
    pub data_dir: String,
    pub config_dir: String,
    pub config_file_present: bool,
    pub camera_count: usize,
    /// Why `cameras.json` could not be read, if it could not.
    pub camera_store_error: Option<String>,
}

pub fn run_health_check<H: Host + ?Sized>(
    host: &H,
    config: &LauncherConfig,
    config_file: &Path,
) -> HealthReport {
    info!("Running health check");

    let (os, arch) = (std::env::consts::OS, std::env::consts::ARCH);
    let runtime_asset = runtime_asset_name(os, arch).map(str::to_string);
    info!("Platform {}/{}, runtime asset: {:?}", os, arch, runtime_asset);

    let data_dir = host.user_data_dir();
    let config_dir = host.user_config_dir();
    let path = config
        .runtime
        .path
        .clone()
        .unwrap_or_else(|| runtime_path(&data_dir));
    let runtime_installed = path.is_file();
    let runtime_digest = if runtime_installed {
        match sha256_file(&path) {
            Ok(digest) => Some(digest.to_string()),
            Err(e) => {
                info!("Could not hash {:?}: {}", path, e);
                None
            }
        }
    } else {
        None
    };
    info!("Runtime installed: {} at {:?}", runtime_installed, path);

    let (camera_count, camera_store_error) = match CameraStore::open_in(&config_dir) {
        Ok(store) => (store.len(), None),
        Err(e) => {
            warn!("Camera store in {:?} is unreadable: {}", config_dir, e);
            (0, Some(e.to_string()))
        }
    };

    HealthReport {
        platform: format!("{}/{}", os, arch),
        runtime_asset,
        runtime_path: path.to_string_lossy().to_string(),
        runtime_installed,
        runtime_digest,
        update_checks_enabled: config.runtime.check_updates,
        data_dir: data_dir.to_string_lossy().to_string(),
        config_dir: config_dir.to_string_lossy().to_string(),
        config_file_present: config_file.is_file(),
        camera_count,
        camera_store_error,
    }
}
