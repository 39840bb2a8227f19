use std::path::Path;

use crate::error::{LauncherError, Result};

/// Name of the runtime executable inside the user data directory.
#[cfg(windows)]
pub const RUNTIME_FILE_NAME: &str = "duosplit.exe";
#[cfg(not(windows))]
pub const RUNTIME_FILE_NAME: &str = "duosplit";

/// Release asset carrying the prebuilt runtime for `os`/`arch`, using the
/// values of `std::env::consts`.
pub fn runtime_asset_name(os: &str, arch: &str) -> Option<&'static str> {
    match (os, arch) {
        ("linux", "x86_64") => Some("duosplit-x86_64-unknown-linux-gnu"),
        ("linux", "aarch64") => Some("duosplit-aarch64-unknown-linux-gnu"),
        ("windows", "x86_64") => Some("duosplit-x86_64-pc-windows-msvc.exe"),
        _ => None,
    }
}

/// Asset name for the running platform.
pub fn current_asset_name(repository: &str, data_dir: &Path) -> Result<&'static str> {
    asset_name_for(repository, data_dir, std::env::consts::OS, std::env::consts::ARCH)
}

/// Asset name for `os`/`arch`.
///
/// Unsupported platforms get an error telling the user where to put a
/// self-built runtime.
pub fn asset_name_for(
    repository: &str,
    data_dir: &Path,
    os: &str,
    arch: &str,
) -> Result<&'static str> {
    runtime_asset_name(os, arch).ok_or_else(|| LauncherError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
        repository: repository.to_string(),
        data_dir: data_dir.to_path_buf(),
        file_name: RUNTIME_FILE_NAME.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_platforms() {
        assert_eq!(
            runtime_asset_name("linux", "x86_64"),
            Some("duosplit-x86_64-unknown-linux-gnu")
        );
        assert_eq!(
            runtime_asset_name("linux", "aarch64"),
            Some("duosplit-aarch64-unknown-linux-gnu")
        );
        assert_eq!(
            runtime_asset_name("windows", "x86_64"),
            Some("duosplit-x86_64-pc-windows-msvc.exe")
        );
    }

    #[test]
    fn test_unsupported_platforms() {
        assert_eq!(runtime_asset_name("macos", "aarch64"), None);
        assert_eq!(runtime_asset_name("windows", "x86"), None);
        assert_eq!(runtime_asset_name("freebsd", "x86_64"), None);
    }

    #[test]
    fn test_unsupported_platform_error_names_build_location() {
        let data_dir = Path::new("/home/astro/.local/share/duosplit");
        match asset_name_for("Seggan/duosplit", data_dir, "freebsd", "x86_64") {
            Err(LauncherError::UnsupportedPlatform { os, file_name, data_dir: dir, .. }) => {
                assert_eq!(os, "freebsd");
                assert_eq!(file_name, RUNTIME_FILE_NAME);
                assert_eq!(dir, data_dir);
            }
            other => panic!("Expected UnsupportedPlatform, got {:?}", other),
        }
        assert_eq!(
            asset_name_for("Seggan/duosplit", data_dir, "linux", "aarch64").unwrap(),
            "duosplit-aarch64-unknown-linux-gnu"
        );
    }
}
