use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::digest::{sha256_file, Sha256Digest};
use super::download::download_runtime;
use super::platform::{asset_name_for, RUNTIME_FILE_NAME};
use super::release::{ReleaseAsset, ReleaseClient};
use crate::config::RuntimeConfig;
use crate::error::{LauncherError, Result};
use crate::host::Host;

/// How the runtime was obtained by [`ensure_runtime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeStatus {
    /// A user-supplied executable; nothing was checked.
    Custom,
    /// The runtime was missing and has been downloaded.
    Installed { tag: String },
    /// A different build was published and has been downloaded.
    Updated { tag: String },
    UpToDate { tag: String },
    /// The latest release could not be matched against the local file.
    Unverified,
    /// The release feed could not be reached; the local runtime is used as is.
    Offline,
    /// Update checks are disabled.
    Skipped,
}

/// A runtime ready to be launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub path: PathBuf,
    pub status: RuntimeStatus,
}

/// Default location of the runtime inside the host's data directory.
pub fn runtime_path(data_dir: &Path) -> PathBuf {
    data_dir.join(RUNTIME_FILE_NAME)
}

/// Make sure a runtime is installed and, if possible, current.
pub async fn ensure_runtime<H: Host + ?Sized>(host: &H, config: &RuntimeConfig) -> Result<RuntimeInfo> {
    ensure_runtime_on(host, config, std::env::consts::OS, std::env::consts::ARCH).await
}

/// [`ensure_runtime`] for an explicit `os`/`arch` pair.
pub async fn ensure_runtime_on<H: Host + ?Sized>(
    host: &H,
    config: &RuntimeConfig,
    os: &str,
    arch: &str,
) -> Result<RuntimeInfo> {
    if let Some(path) = &config.path {
        if !path.is_file() {
            return Err(LauncherError::Config(format!(
                "runtime.path {:?} does not exist",
                path
            )));
        }
        info!("Using configured runtime at {:?}", path);
        return Ok(RuntimeInfo {
            path: path.clone(),
            status: RuntimeStatus::Custom,
        });
    }

    let data_dir = host.user_data_dir();
    let path = runtime_path(&data_dir);

    let asset_name = match asset_name_for(&config.repository, &data_dir, os, arch) {
        Ok(name) => name,
        // A self-built runtime placed where the error message asks for it.
        Err(LauncherError::UnsupportedPlatform { .. }) if path.is_file() => {
            host.log("No prebuilt runtime for this platform; using the local duosplit build.");
            return Ok(RuntimeInfo {
                path,
                status: RuntimeStatus::Custom,
            });
        }
        Err(e) => return Err(e),
    };

    let client = ReleaseClient::new(&config.api_base, &config.repository)?;
    let status = sync_runtime(host, &client, asset_name, &path, config.check_updates).await?;
    Ok(RuntimeInfo { path, status })
}

/// Install the runtime at `path` if missing, otherwise compare it against
/// the digest published for `asset_name` in the latest release.
pub async fn sync_runtime<H: Host + ?Sized>(
    host: &H,
    client: &ReleaseClient,
    asset_name: &str,
    path: &Path,
    check_updates: bool,
) -> Result<RuntimeStatus> {
    if !path.exists() {
        host.log("Duosplit runtime not found. Downloading...");
        let release = client.latest_release().await?;
        let asset = release
            .find_asset(asset_name)
            .ok_or_else(|| LauncherError::AssetNotFound(asset_name.to_string()))?;
        download_with_progress(host, client, asset, path).await?;
        host.log(&format!("Installed duosplit {}", release.label()));
        return Ok(RuntimeStatus::Installed {
            tag: release.tag_name.clone(),
        });
    }

    if !check_updates {
        info!("Update check disabled, using {:?}", path);
        return Ok(RuntimeStatus::Skipped);
    }

    let current = sha256_file(path)?;
    let release = match client.latest_release().await {
        Ok(release) => release,
        Err(e @ (LauncherError::Network(_) | LauncherError::HttpStatus { .. })) => {
            let reason = if e.is_connectivity() {
                "the release server is unreachable"
            } else {
                "the release feed returned an error"
            };
            warn!("Update check failed: {}", e);
            host.log(&format!(
                "Could not check for duosplit updates ({}); continuing with the installed runtime.",
                reason
            ));
            return Ok(RuntimeStatus::Offline);
        }
        Err(e) => return Err(e),
    };

    let Some(asset) = release.find_asset(asset_name) else {
        warn!("Release {} has no asset named {}", release.tag_name, asset_name);
        return Ok(RuntimeStatus::Unverified);
    };
    let expected = match asset.digest.as_deref().map(str::parse::<Sha256Digest>) {
        Some(Ok(digest)) => digest,
        Some(Err(e)) => {
            warn!("Ignoring unusable digest for {}: {}", asset.name, e);
            return Ok(RuntimeStatus::Unverified);
        }
        None => {
            warn!("Release {} publishes no digest for {}", release.tag_name, asset.name);
            return Ok(RuntimeStatus::Unverified);
        }
    };

    if current == expected {
        host.log("Duosplit runtime is up to date.");
        return Ok(RuntimeStatus::UpToDate {
            tag: release.tag_name.clone(),
        });
    }

    info!("Local runtime {} differs from published {}", current, expected);
    host.log("A new version of duosplit is available. Downloading update...");
    download_with_progress(host, client, asset, path).await?;
    host.log(&format!("Updated duosplit to {}", release.label()));
    Ok(RuntimeStatus::Updated {
        tag: release.tag_name.clone(),
    })
}

async fn download_with_progress<H: Host + ?Sized>(
    host: &H,
    client: &ReleaseClient,
    asset: &ReleaseAsset,
    path: &Path,
) -> Result<Sha256Digest> {
    let message = format!("Downloading {}", asset.name);
    let result = download_runtime(client.inner_client(), asset, path, |done, total| {
        let fraction = match total {
            Some(total) if total > 0 => done as f64 / total as f64,
            _ => 0.0,
        };
        host.update_progress(&message, fraction);
    })
    .await;
    host.clear_progress();
    result
}
