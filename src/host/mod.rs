//! The seam between the plugin and the image-processing host application.
//!
//! The plugin never talks to a display, a log window or the filesystem
//! layout of the host directly; it goes through [`Host`]. The crate ships
//! [`TerminalHost`], which plays the host's part on a terminal.

pub mod terminal;

use std::path::PathBuf;

use crate::error::Result;

pub use terminal::TerminalHost;

/// Services the host application offers to the plugin.
///
/// Implementations must be shareable across the threads that relay the
/// runtime's output.
pub trait Host: Sync {
    /// Append a line to the host's log.
    fn log(&self, message: &str);

    /// Show progress; `fraction` is clamped to `[0, 1]`.
    fn update_progress(&self, message: &str, fraction: f64);

    fn clear_progress(&self);

    fn info_message(&self, title: &str, message: &str);

    fn error_message(&self, title: &str, message: &str);

    /// Per-user data directory for this plugin. The runtime lives here.
    fn user_data_dir(&self) -> PathBuf;

    /// Per-user config directory for this plugin.
    fn user_config_dir(&self) -> PathBuf;

    /// The image currently loaded in the host.
    fn current_image(&self) -> Result<HostImage>;
}

/// Pixel data handed over by the host.
///
/// Samples are planar (all of channel 0, then channel 1, ...), rows top to
/// bottom, normalised to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HostImage {
    /// Name used for the exported file, without extension.
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<f32>,
}

impl HostImage {
    pub fn plane(&self, channel: usize) -> &[f32] {
        let len = self.width * self.height;
        &self.data[channel * len..(channel + 1) * len]
    }

    pub fn is_consistent(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.channels > 0
            && self.data.len() == self.width * self.height * self.channels
    }
}
