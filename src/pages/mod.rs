//! The two screens of the parameter form.

pub mod camera_profile;
pub mod run_parameters;

pub use camera_profile::camera_profile_screen;
pub use run_parameters::{run_parameters_screen, RunForm};
