//! Run configuration.
//!
//! A JSON file describes the researcher, the sections to generate, keyword
//! lists, manual injections, and optional curated extra records. Manual
//! injections are written as 2-element `[anchor, text]` arrays; anything
//! else is a fatal, explained error rather than a silent skip.
//!
//! The API token is resolved in order: `--token` flag, `ADS_API_TOKEN`
//! environment variable, then the `~/.ads/dev_key` file.

use crate::error::{AdsBibError, Result};
use crate::filter::Authorship;
use crate::paper::Paper;
use crate::section::{Anchor, Injection};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Environment variable checked for the API token
const TOKEN_ENV_VAR: &str = "ADS_API_TOKEN";

/// Reject keywords applied to proceedings sections when the config gives none
const DEFAULT_PROCEEDINGS_REJECT: &[&str] = &[
    "Abstracts",
    "European Planetary Science Congress",
    "VizieR",
    "arXiv e-prints",
    "Bulletin of the American Astronomical Society",
    "Lunar and Planetary Science Conference",
];

/// Top-level run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Target researcher, "Last, First"
    pub researcher: String,
    /// Inclusive (start, end) year range for every query
    #[serde(default)]
    pub years: Option<(i32, i32)>,
    /// Author display cutoff K; also defines major authorship
    #[serde(default = "default_cutoff")]
    pub cutoff: usize,
    /// Wrap the researcher's name in a bold marker
    #[serde(default)]
    pub highlight: bool,
    /// Abstract keyword gate; absent means no gating
    #[serde(default)]
    pub abstract_keywords: Option<Vec<String>>,
    /// Sections to generate, in document order
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    /// Hand-curated records merged with query results before dedup
    #[serde(default)]
    pub extra_papers: Vec<Paper>,
    /// Researchers for the group listing; defaults to just `researcher`
    #[serde(default)]
    pub group: Vec<GroupMember>,
}

fn default_cutoff() -> usize {
    3
}

/// One section of the output document.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    /// Section title as it appears in the document
    pub name: String,
    /// Refereed filter passed to the query; null queries both
    #[serde(default)]
    pub refereed: Option<bool>,
    #[serde(default)]
    pub authorship: Authorship,
    #[serde(default)]
    pub reject_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub select_keywords: Option<Vec<String>>,
    /// Raw `[anchor, text]` pairs, validated by [`SectionSpec::injections`]
    #[serde(default)]
    pub injections: Vec<Value>,
}

/// One researcher in a group listing, with an optional year-range override.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMember {
    pub name: String,
    #[serde(default)]
    pub years: Option<(i32, i32)>,
}

impl RunConfig {
    /// Load and validate a configuration file.
    ///
    /// Injection entries are validated eagerly so a malformed one aborts
    /// before any query runs.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        if config.researcher.trim().is_empty() {
            return Err(AdsBibError::Config(
                "researcher must not be empty".to_string(),
            ));
        }
        for section in &config.sections {
            section.injections()?;
        }
        Ok(config)
    }

    /// Researchers to include in a group listing.
    pub fn group_members(&self) -> Vec<GroupMember> {
        if self.group.is_empty() {
            vec![GroupMember {
                name: self.researcher.clone(),
                years: self.years,
            }]
        } else {
            self.group.clone()
        }
    }

    /// The standard four-section layout used when the config lists none:
    /// refereed publications split major/minor, then conference proceedings
    /// split major/minor with the usual abstract-collection rejects.
    pub fn default_sections() -> Vec<SectionSpec> {
        let reject: Vec<String> = DEFAULT_PROCEEDINGS_REJECT
            .iter()
            .map(|s| s.to_string())
            .collect();
        vec![
            SectionSpec {
                name: "Refereed Publications".to_string(),
                refereed: Some(true),
                authorship: Authorship::Major,
                reject_keywords: None,
                select_keywords: None,
                injections: Vec::new(),
            },
            SectionSpec {
                name: "Other Refereed Publications".to_string(),
                refereed: Some(true),
                authorship: Authorship::Minor,
                reject_keywords: None,
                select_keywords: None,
                injections: Vec::new(),
            },
            SectionSpec {
                name: "Conference Proceedings".to_string(),
                refereed: Some(false),
                authorship: Authorship::Major,
                reject_keywords: Some(reject.clone()),
                select_keywords: None,
                injections: Vec::new(),
            },
            SectionSpec {
                name: "Other Conference Proceedings".to_string(),
                refereed: Some(false),
                authorship: Authorship::Minor,
                reject_keywords: Some(reject),
                select_keywords: None,
                injections: Vec::new(),
            },
        ]
    }
}

impl SectionSpec {
    /// Validate and convert the raw injection entries.
    pub fn injections(&self) -> Result<Vec<Injection>> {
        self.injections.iter().map(parse_injection).collect()
    }
}

/// Parse one `[anchor, text]` pair.
///
/// The anchor is a year number, a numeric year string, or the
/// end-of-list marker ("end", also accepted as "append-at-end" /
/// "append at end").
fn parse_injection(entry: &Value) -> Result<Injection> {
    let malformed = |reason: &str| AdsBibError::Injection {
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let pair = entry
        .as_array()
        .ok_or_else(|| malformed("expected a 2-element [anchor, text] array"))?;
    if pair.len() != 2 {
        return Err(malformed("expected exactly 2 elements: anchor and text"));
    }

    let anchor = match &pair[0] {
        Value::Number(n) => {
            let year = n
                .as_i64()
                .ok_or_else(|| malformed("anchor year must be an integer"))?;
            Anchor::Year(
                i32::try_from(year).map_err(|_| malformed("anchor year out of range"))?,
            )
        }
        Value::String(s) => match s.trim() {
            "end" | "append-at-end" | "append at end" => Anchor::End,
            other => Anchor::Year(
                other
                    .parse()
                    .map_err(|_| malformed("anchor must be a year or \"end\""))?,
            ),
        },
        _ => return Err(malformed("anchor must be a year or \"end\"")),
    };

    let text = pair[1]
        .as_str()
        .ok_or_else(|| malformed("injection text must be a string"))?;
    if text.is_empty() {
        return Err(malformed("injection text must not be empty"));
    }

    Ok(Injection {
        anchor,
        text: text.to_string(),
    })
}

/// Resolve the ADS API token: flag, environment, then token file.
pub fn resolve_token(flag: Option<&str>) -> Result<String> {
    if let Some(token) = flag {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }

    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }

    if let Some(home) = dirs::home_dir() {
        let key_file = home.join(".ads").join("dev_key");
        if let Ok(token) = std::fs::read_to_string(&key_file) {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
    }

    Err(AdsBibError::Auth("no API token found".to_string()))
}
