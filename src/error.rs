use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error(
        "No prebuilt duosplit runtime exists for {os}/{arch}. Build it from \
         https://github.com/{repository} and place the executable in '{}' as '{file_name}'.",
        .data_dir.display()
    )]
    UnsupportedPlatform {
        os: String,
        arch: String,
        repository: String,
        data_dir: PathBuf,
        file_name: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error fetching '{url}': {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Could not find a duosplit runtime named '{0}' in the latest release")]
    AssetNotFound(String),

    #[error("Checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Invalid digest '{0}': expected 'sha256:' followed by 64 hex characters")]
    InvalidDigest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Failed to launch runtime at {}: {source}", .path.display())]
    RuntimeLaunch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Host error: {0}")]
    Host(String),
}

impl LauncherError {
    /// True for failures that mean the release feed could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        match self {
            LauncherError::Network(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

impl From<tempfile::PersistError> for LauncherError {
    fn from(err: tempfile::PersistError) -> Self {
        LauncherError::Io(err.error)
    }
}

impl From<LauncherError> for String {
    fn from(err: LauncherError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_message_names_data_dir() {
        let err = LauncherError::UnsupportedPlatform {
            os: "macos".to_string(),
            arch: "aarch64".to_string(),
            repository: "Seggan/duosplit".to_string(),
            data_dir: PathBuf::from("/home/user/.local/share/duosplit"),
            file_name: "duosplit".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("macos/aarch64"), "Unexpected message: {}", msg);
        assert!(msg.contains("https://github.com/Seggan/duosplit"));
        assert!(msg.contains("/home/user/.local/share/duosplit"));
    }

    #[test]
    fn test_non_network_errors_are_not_connectivity() {
        let err = LauncherError::AssetNotFound("duosplit-x".to_string());
        assert!(!err.is_connectivity());
        let err = LauncherError::HttpStatus {
            url: "https://api.github.com".to_string(),
            status: 503,
        };
        assert!(!err.is_connectivity());
    }
}
