/// Portfolio content loaded from `profile.json`.
/// Every part is optional: a missing or broken file degrades each
/// command to its fallback text instead of failing dispatch.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PortfolioData {
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub skills: Option<Vec<Skill>>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    #[serde(default)]
    pub education: Option<Vec<Education>>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role_main: Option<String>,
    #[serde(default)]
    pub about: Option<About>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct About {
    #[serde(default)]
    pub summary_intro: Option<String>,
    #[serde(default)]
    pub summary_highlight1: Option<String>,
    #[serde(default)]
    pub summary_text1: Option<String>,
    #[serde(default)]
    pub summary_highlight2: Option<String>,
}

/// Skill card. The terminal only lists names; the remaining fields are
/// part of the data contract and kept for forward compatibility.
#[allow(dead_code)]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
}

/// Project card. Same deal: the terminal lists titles only.
#[allow(dead_code)]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub links: ProjectLinks,
}

#[allow(dead_code)]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectLinks {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current: bool,
}

/// Serialized back out verbatim by `cat contact_info.json`, so absent
/// keys must stay absent.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Load the data file, falling back to empty content on any failure.
pub fn load(path: &Path) -> PortfolioData {
    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<PortfolioData>(&text) {
            Ok(data) => {
                info!(path = %path.display(), "portfolio data loaded");
                data
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "profile.json parse failed, running with fallbacks");
                PortfolioData::default()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "profile.json not readable, running with fallbacks");
            PortfolioData::default()
        }
    }
}
