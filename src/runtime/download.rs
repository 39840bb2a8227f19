use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::digest::Sha256Digest;
use super::release::ReleaseAsset;
use crate::error::{LauncherError, Result};

/// Download `asset` to `target`, verifying its published digest.
///
/// The body is streamed into a temp file next to `target` and hashed on the
/// way. Only a verified file replaces `target`, so a failed or tampered
/// download leaves any existing runtime in place. `progress` receives
/// `(downloaded, total)` after every chunk.
pub async fn download_runtime<F>(
    client: &reqwest::Client,
    asset: &ReleaseAsset,
    target: &Path,
    mut progress: F,
) -> Result<Sha256Digest>
where
    F: FnMut(u64, Option<u64>),
{
    let expected = asset
        .digest
        .as_deref()
        .map(str::parse::<Sha256Digest>)
        .transpose()?;
    if expected.is_none() {
        warn!("Release asset '{}' has no published digest", asset.name);
    }

    let parent = target
        .parent()
        .ok_or_else(|| LauncherError::Host(format!("Target path has no parent directory: {:?}", target)))?;
    std::fs::create_dir_all(parent)?;

    info!("Downloading {} from {}", asset.name, asset.browser_download_url);
    let mut response = client.get(&asset.browser_download_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LauncherError::HttpStatus {
            url: asset.browser_download_url.clone(),
            status: status.as_u16(),
        });
    }

    let total = response
        .content_length()
        .or((asset.size > 0).then_some(asset.size));

    let mut temp = NamedTempFile::new_in(parent)?;
    let mut hasher = Sha256::new();
    let mut downloaded = 0u64;
    progress(0, total);
    while let Some(chunk) = response.chunk().await? {
        hasher.update(&chunk);
        temp.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress(downloaded, total);
    }
    temp.flush()?;

    let actual = Sha256Digest::from_hasher(hasher);
    if let Some(expected) = expected {
        if actual != expected {
            return Err(LauncherError::ChecksumMismatch {
                path: target.to_path_buf(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    make_executable(temp.path())?;
    temp.persist(target)?;

    info!("Installed {} ({} bytes, {})", asset.name, downloaded, actual);
    Ok(actual)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
