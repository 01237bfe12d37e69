//! Release check against the project's latest published version

use std::cmp::Ordering;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::{PanelError, PanelResult};

/// Latest-release endpoint of the public repository
pub const DEFAULT_UPDATE_URL: &str =
    "https://api.github.com/repos/TMarccci/Zebra-Label-Printer/releases/latest";

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    Available { latest: String },
    /// Running a build newer than the last release
    Ahead { latest: String },
}

impl UpdateStatus {
    pub fn message(&self, current: &str) -> String {
        match self {
            Self::UpToDate => format!("You are running the latest version ({}).", current),
            Self::Available { latest } => {
                format!("Update available: {} (running {}).", latest, current)
            }
            Self::Ahead { latest } => {
                format!("Running {}, newer than the latest release {}.", current, latest)
            }
        }
    }
}

/// Numeric components of a version tag, `v1.2.3` -> `[1, 2, 3]`
///
/// Non-numeric suffixes on a component are ignored (`3-beta` -> 3).
pub fn parse_version(tag: &str) -> Vec<u64> {
    tag.trim()
        .trim_start_matches(['v', 'V'])
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}

/// Compare two version tags, padding the shorter with zeros
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a, b) = (parse_version(a), parse_version(b));
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub fn status_for(current: &str, latest: &str) -> UpdateStatus {
    match compare_versions(latest, current) {
        Ordering::Greater => UpdateStatus::Available {
            latest: latest.to_string(),
        },
        Ordering::Equal => UpdateStatus::UpToDate,
        Ordering::Less => UpdateStatus::Ahead {
            latest: latest.to_string(),
        },
    }
}

/// Fetch the latest release tag from `url` and compare it to `current`
#[instrument]
pub async fn check_for_update(url: &str, current: &str) -> PanelResult<UpdateStatus> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("zlp-panel/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(PanelError::UpdateStatus(resp.status().as_u16()));
    }
    let release: Release = resp.json().await?;
    info!(latest = %release.tag_name, "Fetched latest release");
    Ok(status_for(current, &release.tag_name))
}
