use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::camera::{CameraProfile, CameraStore};

/// A saved camera, as listed to the user.
#[derive(Debug, Clone, Serialize)]
pub struct CameraEntry {
    pub name: String,
    #[serde(flatten)]
    pub profile: CameraProfile,
}

pub fn list_cameras(config_dir: &Path) -> anyhow::Result<Vec<CameraEntry>> {
    let store = CameraStore::open_in(config_dir)?;
    Ok(store
        .names()
        .into_iter()
        .filter_map(|name| {
            store.get(name).map(|profile| CameraEntry {
                name: name.to_string(),
                profile: *profile,
            })
        })
        .collect())
}

pub fn show_camera(config_dir: &Path, name: &str) -> anyhow::Result<CameraEntry> {
    let store = CameraStore::open_in(config_dir)?;
    let profile = store
        .get(name)
        .copied()
        .with_context(|| format!("No saved camera named '{}'", name.trim()))?;
    Ok(CameraEntry {
        name: name.trim().to_string(),
        profile,
    })
}

/// Create or replace a camera from the six QE values in runtime flag order.
pub fn set_camera(config_dir: &Path, name: &str, values: [f64; 6]) -> anyhow::Result<CameraEntry> {
    let profile = CameraProfile::from_values(values)?;
    let mut store = CameraStore::open_in(config_dir)?;
    store.upsert(name, profile)?;
    Ok(CameraEntry {
        name: name.trim().to_string(),
        profile,
    })
}

/// Returns false if no such camera existed.
pub fn remove_camera(config_dir: &Path, name: &str) -> anyhow::Result<bool> {
    let mut store = CameraStore::open_in(config_dir)?;
    let removed = store.remove(name)?;
    if !removed {
        info!("No camera named '{}' to remove", name.trim());
    }
    Ok(removed)
}

/// Tabular rendering used by `camera list` and `camera show`.
pub fn format_entries(entries: &[CameraEntry]) -> String {
    let mut out = format!(
        "{:<24} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7}\n",
        "CAMERA", "R-Ha", "G-Ha", "B-Ha", "R-OIII", "G-OIII", "B-OIII"
    );
    for entry in entries {
        let v = entry.profile.values();
        out.push_str(&format!(
            "{:<24} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3}\n",
            entry.name, v[0], v[1], v[2], v[3], v[4], v[5]
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_list_remove() {
        let dir = tempfile::tempdir().unwrap();
        set_camera(dir.path(), "ASI2600MC", [0.8, 0.1, 0.02, 0.05, 0.7, 0.45]).unwrap();

        let entries = list_cameras(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ASI2600MC");
        assert_eq!(entries[0].profile.green.oiii, 0.7);

        assert!(remove_camera(dir.path(), "ASI2600MC").unwrap());
        assert!(!remove_camera(dir.path(), "ASI2600MC").unwrap());
        assert!(list_cameras(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_show_missing_camera() {
        let dir = tempfile::tempdir().unwrap();
        let err = show_camera(dir.path(), "nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        assert!(set_camera(dir.path(), "cam", [1.5, 0.1, 0.02, 0.05, 0.7, 0.45]).is_err());
        assert!(list_cameras(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = CameraEntry {
            name: "cam".to_string(),
            profile: CameraProfile::from_values([0.5; 6]).unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "cam");
        assert_eq!(json["red"]["ha"], 0.5);
    }

    #[test]
    fn test_format_entries_has_header_and_row() {
        let entry = CameraEntry {
            name: "cam".to_string(),
            profile: CameraProfile::from_values([0.5; 6]).unwrap(),
        };
        let table = format_entries(&[entry]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("CAMERA"));
        assert!(lines[1].starts_with("cam"));
        assert!(lines[1].contains("0.500"));
    }
}
