//! Paper records returned by the ADS query layer.
//!
//! A [`Paper`] is a plain value record: every bibliographic field is optional
//! and absence means "omit this clause" downstream, never an error. Curated
//! records supplied by hand in the config use the same type, so they merge
//! with queried results before deduplication.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One bibliographic record.
///
/// Field names follow the ADS `fl` response fields so the same struct decodes
/// API documents and config-supplied curated records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paper {
    /// ADS bibcode, the stable identifier used for dedup
    #[serde(default)]
    pub bibcode: Option<String>,
    /// Title variants; only the first is used
    #[serde(default)]
    pub title: Vec<String>,
    /// Ordered author list, "Last, First Middle" form
    #[serde(default)]
    pub author: Vec<String>,
    /// Publication year as returned by ADS
    #[serde(default)]
    pub year: Option<String>,
    /// Venue (journal or conference) name
    #[serde(rename = "pub", default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    /// Page list; only the first entry is used
    #[serde(default)]
    pub page: Option<Vec<String>>,
    #[serde(default)]
    pub doi: Option<Vec<String>>,
    /// Identifier list, may contain an arXiv id
    #[serde(default)]
    pub identifier: Option<Vec<String>>,
    /// Citing bibcodes; the citation count is the length of this list
    #[serde(default)]
    pub citation: Option<Vec<String>>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    /// Affiliation strings, one per author
    #[serde(default)]
    pub aff: Option<Vec<String>>,
}

impl Paper {
    /// First title variant, if any.
    pub fn first_title(&self) -> Option<&str> {
        self.title.first().map(String::as_str)
    }

    /// Publication year as a number, when parseable.
    pub fn year_num(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }

    /// Content-based dedup key.
    ///
    /// Bibcodes are the stable identifier; records without one (curated
    /// entries, mostly) fall back to a title+year key.
    pub fn bib_key(&self) -> String {
        match self.bibcode.as_deref().filter(|b| !b.is_empty()) {
            Some(b) => b.to_lowercase(),
            None => format!(
                "{}|{}",
                self.first_title().unwrap_or_default().to_lowercase(),
                self.year.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Drop repeated records, keeping the first occurrence of each key.
///
/// The same paper shows up once per matching author query, so multi-author
/// runs must dedup before counting or rendering anything.
pub fn dedup_papers(papers: Vec<Paper>) -> Vec<Paper> {
    let mut seen: HashSet<String> = HashSet::new();
    papers
        .into_iter()
        .filter(|p| seen.insert(p.bib_key()))
        .collect()
}

/// Append curated records to a queried list, then dedup.
///
/// Queried papers keep priority: a curated duplicate of a fetched record is
/// the one that gets dropped.
pub fn merge_curated(queried: Vec<Paper>, curated: &[Paper]) -> Vec<Paper> {
    let mut all = queried;
    all.extend(curated.iter().cloned());
    dedup_papers(all)
}
