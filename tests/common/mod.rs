#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use duosplit_launcher::error::{LauncherError, Result};
use duosplit_launcher::host::{Host, HostImage};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A host that remembers everything the plugin told it.
pub struct RecordingHost {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
    pub image: Option<HostImage>,
    pub logs: Mutex<Vec<String>>,
    pub progress: Mutex<Vec<f64>>,
    /// When each progress update arrived.
    pub progress_times: Mutex<Vec<Instant>>,
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn new(root: &Path) -> Self {
        Self {
            data_dir: root.join("data"),
            config_dir: root.join("config"),
            image: None,
            logs: Mutex::new(Vec::new()),
            progress: Mutex::new(Vec::new()),
            progress_times: Mutex::new(Vec::new()),
            infos: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.progress.lock().unwrap().clone()
    }

    pub fn progress_times(&self) -> Vec<Instant> {
        self.progress_times.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }
}

impl Host for RecordingHost {
    fn log(&self, message: &str) {
        self.logs.lock().unwrap().push(message.to_string());
    }

    fn update_progress(&self, _message: &str, fraction: f64) {
        self.progress.lock().unwrap().push(fraction);
        self.progress_times.lock().unwrap().push(Instant::now());
    }

    fn clear_progress(&self) {}

    fn info_message(&self, _title: &str, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error_message(&self, _title: &str, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn user_data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn user_config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    fn current_image(&self) -> Result<HostImage> {
        self.image
            .clone()
            .ok_or_else(|| LauncherError::Host("No image loaded".to_string()))
    }
}

/// A small RGB gradient.
pub fn rgb_image(width: usize, height: usize) -> HostImage {
    let len = width * height;
    let data = (0..3 * len).map(|i| (i % len) as f32 / len as f32).collect();
    HostImage {
        name: "M42".to_string(),
        width,
        height,
        channels: 3,
        data,
    }
}
