use tracing::info;

use crate::config::LauncherConfig;
use crate::host::Host;
use crate::runtime::{ensure_runtime, RuntimeInfo, RuntimeStatus};

/// Stage one: install or update the runtime.
///
/// Failures are shown to the user through the host before being returned.
pub async fn update_runtime<H: Host + ?Sized>(
    host: &H,
    config: &LauncherConfig,
) -> anyhow::Result<RuntimeInfo> {
    match ensure_runtime(host, &config.runtime).await {
        Ok(info) => {
            info!("Runtime ready at {:?} ({:?})", info.path, info.status);
            Ok(info)
        }
        Err(e) => {
            host.error_message("duosplit runtime", &e.to_string());
            Err(e.into())
        }
    }
}

/// One-line description of a [`RuntimeStatus`].
pub fn describe_status(status: &RuntimeStatus) -> String {
    match status {
        RuntimeStatus::Custom => "using a locally built runtime".to_string(),
        RuntimeStatus::Installed { tag } => format!("installed {}", tag),
        RuntimeStatus::Updated { tag } => format!("updated to {}", tag),
        RuntimeStatus::UpToDate { tag } => format!("up to date ({})", tag),
        RuntimeStatus::Unverified => {
            "installed, but the latest release could not be verified against it".to_string()
        }
        RuntimeStatus::Offline => "installed; update check skipped (offline)".to_string(),
        RuntimeStatus::Skipped => "installed; update checks are disabled".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_status() {
        assert_eq!(
            describe_status(&RuntimeStatus::Updated {
                tag: "v0.4.0".to_string()
            }),
            "updated to v0.4.0"
        );
        assert!(describe_status(&RuntimeStatus::Offline).contains("offline"));
    }
}
