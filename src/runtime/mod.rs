//! Stage one: locating, downloading and verifying the duosplit runtime.

pub mod digest;
pub mod download;
pub mod platform;
pub mod release;
pub mod updater;

pub use digest::{sha256_file, Sha256Digest};
pub use release::{Release, ReleaseAsset, ReleaseClient};
pub use updater::{ensure_runtime, runtime_path, RuntimeInfo, RuntimeStatus};
