//! Launcher for the duosplit Ha/OIII channel splitter.
//!
//! Stage one ([`runtime`]) keeps a verified copy of the duosplit runtime in
//! the user data directory. Stage two ([`commands::split`]) exports the
//! host's current image, collects parameters and supervises the runtime.

pub mod camera;
pub mod commands;
pub mod components;
pub mod config;
pub mod error;
pub mod host;
pub mod imaging;
pub mod pages;
pub mod process;
pub mod runtime;

pub use error::{LauncherError, Result};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `fallback`; an unparsable fallback means `info`.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
