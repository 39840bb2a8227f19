use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::types::CameraProfile;
use crate::error::{LauncherError, Result};

/// File name of the camera store inside the config directory.
pub const CAMERA_FILE_NAME: &str = "cameras.json";

/// Saved camera profiles, keyed by name, backed by a flat JSON object.
///
/// Every mutation is written through to disk before it returns.
pub struct CameraStore {
    path: PathBuf,
    cameras: BTreeMap<String, CameraProfile>,
}

impl CameraStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let cameras = match std::fs::read_to_string(path) {
            Ok(content) => parse_cameras(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No camera store at {:?}, starting empty", path);
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            cameras,
        })
    }

    /// Open `cameras.json` inside the given config directory.
    pub fn open_in(config_dir: &Path) -> Result<Self> {
        Self::open(&config_dir.join(CAMERA_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Camera names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.cameras.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CameraProfile> {
        self.cameras.get(name.trim())
    }

    /// Insert or replace a camera and persist the store.
    pub fn upsert(&mut self, name: &str, profile: CameraProfile) -> Result<()> {
        let name = normalize_name(name)?;
        profile.validate()?;

        let previous = self.cameras.insert(name.clone(), profile);
        if let Err(e) = self.save() {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(old) => self.cameras.insert(name, old),
                None => self.cameras.remove(&name),
            };
            return Err(e);
        }

        info!("Saved camera profile '{}'", name);
        Ok(())
    }

    /// Remove a camera. Returns false if there was no camera by that name.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        let Some(old) = self.cameras.remove(name) else {
            return Ok(false);
        };
        if let Err(e) = self.save() {
            self.cameras.insert(name.to_string(), old);
            return Err(e);
        }
        info!("Removed camera profile '{}'", name);
        Ok(true)
    }

    /// Write the store atomically: temp file in the same directory, then rename.
    fn save(&self) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            LauncherError::Camera(format!("Store path has no parent directory: {:?}", self.path))
        })?;
        std::fs::create_dir_all(parent)?;

        let mut json = serde_json::to_string_pretty(&self.cameras)?;
        json.push('\n');

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(json.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)?;

        debug!("Wrote {} camera(s) to {:?}", self.cameras.len(), self.path);
        Ok(())
    }
}

fn parse_cameras(content: &str) -> Result<BTreeMap<String, CameraProfile>> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let cameras: BTreeMap<String, CameraProfile> = serde_json::from_str(content)
        .map_err(|e| LauncherError::Camera(format!("Malformed camera store: {}", e)))?;
    for (name, profile) in &cameras {
        profile
            .validate()
            .map_err(|e| LauncherError::Camera(format!("Camera '{}': {}", name, e)))?;
    }
    Ok(cameras)
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LauncherError::Camera("Camera name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::QuantumEfficiency;
    use tempfile::TempDir;

    fn create_test_store() -> (CameraStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = CameraStore::open_in(dir.path()).unwrap();
        (store, dir)
    }

    fn profile(red_ha: f64) -> CameraProfile {
        CameraProfile {
            red: QuantumEfficiency { ha: red_ha, oiii: 0.05 },
            green: QuantumEfficiency { ha: 0.1, oiii: 0.7 },
            blue: QuantumEfficiency { ha: 0.02, oiii: 0.45 },
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (store, _dir) = create_test_store();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_upsert_persists_immediately() {
        let (mut store, dir) = create_test_store();
        store.upsert("ASI2600MC", profile(0.8)).unwrap();

        let reopened = CameraStore::open_in(dir.path()).unwrap();
        assert_eq!(reopened.get("ASI2600MC"), Some(&profile(0.8)));
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let (mut store, _dir) = create_test_store();
        store.upsert("cam", profile(0.8)).unwrap();
        store.upsert("cam", profile(0.6)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("cam").unwrap().red.ha, 0.6);
    }

    #[test]
    fn test_names_trimmed_and_sorted() {
        let (mut store, _dir) = create_test_store();
        store.upsert("  Zwo ", profile(0.8)).unwrap();
        store.upsert("Canon", profile(0.3)).unwrap();
        assert_eq!(store.names(), vec!["Canon", "Zwo"]);
        assert!(store.get(" Zwo").is_some());
    }

    #[test]
    fn test_empty_name_rejected() {
        let (mut store, _dir) = create_test_store();
        assert!(matches!(
            store.upsert("   ", profile(0.8)),
            Err(LauncherError::Camera(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let (mut store, _dir) = create_test_store();
        assert!(store.upsert("cam", profile(1.5)).is_err());
        assert!(store.get("cam").is_none());
    }

    #[test]
    fn test_remove() {
        let (mut store, dir) = create_test_store();
        store.upsert("cam", profile(0.8)).unwrap();
        assert!(store.remove("cam").unwrap());
        assert!(!store.remove("cam").unwrap());

        let reopened = CameraStore::open_in(dir.path()).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_malformed_store_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CAMERA_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(CameraStore::open(&path), Err(LauncherError::Camera(_))));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CAMERA_FILE_NAME);
        std::fs::write(&path, "\n").unwrap();
        assert!(CameraStore::open(&path).unwrap().is_empty());
    }
}
