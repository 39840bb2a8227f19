use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use super::{Host, HostImage};
use crate::error::{LauncherError, Result};

/// Directory name used under the platform data/config roots.
const APP_DIR: &str = "duosplit";

/// Resolution of the progress bar; fractions are mapped onto this many steps.
const PROGRESS_STEPS: u64 = 1000;

/// A [`Host`] backed by the terminal.
///
/// Log lines go through `tracing`, progress is an `indicatif` bar on
/// stderr, and the "loaded image" is an image file named on the command line.
pub struct TerminalHost {
    data_dir: PathBuf,
    config_dir: PathBuf,
    image_path: Option<PathBuf>,
    progress: Mutex<Option<ProgressBar>>,
}

impl TerminalHost {
    /// Create a host using the platform data and config directories.
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| LauncherError::Host("Could not determine the user data directory".into()))?;
        let config_dir = dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| LauncherError::Host("Could not determine the user config directory".into()))?;
        Ok(Self::with_dirs(data_dir, config_dir))
    }

    pub fn with_dirs(data_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            data_dir,
            config_dir,
            image_path: None,
            progress: Mutex::new(None),
        }
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.data_dir = dir;
    }

    pub fn set_config_dir(&mut self, dir: PathBuf) {
        self.config_dir = dir;
    }

    /// Make `path` the host's currently loaded image.
    pub fn load_image(&mut self, path: &Path) {
        self.image_path = Some(path.to_path_buf());
    }

    fn with_bar<R>(&self, f: impl FnOnce(&mut Option<ProgressBar>) -> R) -> R {
        // A poisoned lock only means another relay thread panicked mid-update.
        let mut guard = match self.progress.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl Host for TerminalHost {
    fn log(&self, message: &str) {
        self.with_bar(|bar| match bar {
            Some(pb) => pb.suspend(|| info!("{}", message)),
            None => info!("{}", message),
        });
    }

    fn update_progress(&self, message: &str, fraction: f64) {
        let position = (fraction.clamp(0.0, 1.0) * PROGRESS_STEPS as f64).round() as u64;
        self.with_bar(|bar| {
            let pb = bar.get_or_insert_with(new_progress_bar);
            pb.set_message(message.to_string());
            pb.set_position(position);
        });
    }

    fn clear_progress(&self) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
        });
    }

    fn info_message(&self, title: &str, message: &str) {
        self.with_bar(|bar| {
            let show = || eprintln!("\n== {} ==\n{}\n", title, message);
            match bar {
                Some(pb) => pb.suspend(show),
                None => show(),
            }
        });
    }

    fn error_message(&self, title: &str, message: &str) {
        error!("{}: {}", title, message);
        self.with_bar(|bar| {
            let show = || eprintln!("\n!! {} !!\n{}\n", title, message);
            match bar {
                Some(pb) => pb.suspend(show),
                None => show(),
            }
        });
    }

    fn user_data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn user_config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    fn current_image(&self) -> Result<HostImage> {
        let path = self
            .image_path
            .as_ref()
            .ok_or_else(|| LauncherError::Host("No image is loaded".to_string()))?;
        let img = image::open(path)
            .map_err(|e| LauncherError::Image(format!("Failed to load {:?}: {}", path, e)))?;
        info!("Loaded image {:?}: {}x{}", path, img.width(), img.height());

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(to_host_image(name, img))
    }
}

fn new_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(PROGRESS_STEPS);
    match ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {percent:>3}% {msg}") {
        Ok(style) => pb.set_style(style.progress_chars("=>-")),
        Err(e) => warn!("Invalid progress template: {}", e),
    }
    pb
}

/// Convert a decoded image into planar f32 samples.
///
/// Colour images become three RGB planes (alpha is dropped); greyscale
/// images stay a single plane.
pub fn to_host_image(name: String, img: DynamicImage) -> HostImage {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let plane_len = width * height;

    if img.color().has_color() {
        let rgb = img.into_rgb32f();
        let mut data = vec![0.0f32; plane_len * 3];
        for (i, pixel) in rgb.pixels().enumerate() {
            data[i] = pixel[0];
            data[plane_len + i] = pixel[1];
            data[2 * plane_len + i] = pixel[2];
        }
        HostImage {
            name,
            width,
            height,
            channels: 3,
            data,
        }
    } else {
        let luma = img.to_luma32f();
        HostImage {
            name,
            width,
            height,
            channels: 1,
            data: luma.into_raw(),
        }
    }
}
