use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{LauncherError, Result};

const USER_AGENT: &str = concat!("duosplit-launcher/", env!("CARGO_PKG_VERSION"));

/// Timeout for the release metadata request. Asset downloads are not bounded.
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// A published release, as returned by the GitHub releases API.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    /// Content digest such as `sha256:<hex>`, when the feed publishes one.
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub size: u64,
}

impl Release {
    pub fn find_asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Human-readable label: the release name if set, else the tag.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.tag_name)
    }
}

/// Client for the release-hosting API of one repository.
pub struct ReleaseClient {
    client: reqwest::Client,
    api_base: String,
    repository: String,
}

impl ReleaseClient {
    pub fn new(api_base: &str, repository: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
        })
    }

    pub fn latest_release_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repository)
    }

    /// Fetch metadata of the latest release.
    pub async fn latest_release(&self) -> Result<Release> {
        let url = self.latest_release_url();
        info!("Checking for the latest duosplit release at {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let release: Release = response.json().await?;
        debug!(
            "Latest release {} has {} asset(s)",
            release.tag_name,
            release.assets.len()
        );
        Ok(release)
    }

    /// Get a reference to the inner reqwest client (for asset downloads).
    pub fn inner_client(&self) -> &reqwest::Client {
        &self.client
    }
}
