//! NASA ADS API client.
//!
//! Wraps the `/v1/search/query` endpoint: one query per (researcher,
//! category) combination, bearer-token authentication, results sorted by
//! descending publication date. There is deliberately no retry loop; a
//! network or API failure aborts the run.

use crate::error::{AdsBibError, Result};
use crate::paper::Paper;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// ADS API base URL
const ADS_API_BASE: &str = "https://api.adsabs.harvard.edu/v1";

/// Fields requested for every query; mirrors the [`Paper`] record
const QUERY_FIELDS: &str =
    "bibcode,title,author,year,volume,page,pub,identifier,citation,doi,abstract,aff";

/// Default maximum number of records per query
const DEFAULT_ROWS: usize = 1000;

/// Query parameters for one publication search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// `Some(true)` = refereed only, `Some(false)` = non-refereed only,
    /// `None` = both
    pub refereed: Option<bool>,
    /// Inclusive (start, end) year range
    pub years: Option<(i32, i32)>,
    /// Maximum number of records to fetch
    pub rows: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            refereed: None,
            years: None,
            rows: DEFAULT_ROWS,
        }
    }
}

/// ADS search client holding the API token.
pub struct AdsClient {
    client: reqwest::Client,
    token: String,
}

impl AdsClient {
    /// Create a client with the given API token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("rustadsbib/0.1")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AdsBibError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
        })
    }

    /// Query one researcher's publications, newest first.
    pub async fn search(&self, author: &str, options: &SearchOptions) -> Result<Vec<Paper>> {
        let (q, fq) = build_query(author, options);
        let rows = options.rows.to_string();

        debug!(q = %q, fq = %fq, rows = %rows, "ADS query");

        let response = self
            .client
            .get(format!("{}/search/query", ADS_API_BASE))
            .bearer_auth(&self.token)
            .query(&[
                ("q", q.as_str()),
                ("fq", fq.as_str()),
                ("sort", "date desc"),
                ("rows", rows.as_str()),
                ("fl", QUERY_FIELDS),
            ])
            .send()
            .await?;

        let data: AdsResponse = check_status(response).await?.json().await?;

        info!(
            author = %author,
            found = data.response.docs.len(),
            "ADS query complete"
        );

        Ok(data.response.docs)
    }

    /// Cheap probe query validating the token before any real work.
    ///
    /// An invalid or missing token fails here with a remediation hint
    /// instead of midway through the pipeline.
    pub async fn verify_token(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(AdsBibError::Auth("no API token supplied".to_string()));
        }

        let response = self
            .client
            .get(format!("{}/search/query", ADS_API_BASE))
            .bearer_auth(&self.token)
            .query(&[("q", "star"), ("rows", "1"), ("fl", "bibcode")])
            .send()
            .await?;

        check_status(response).await?;
        debug!("ADS token accepted");
        Ok(())
    }
}

/// Build the (q, fq) payload the way the generated lists always have:
/// author search plus refereed property in `q`, database and year range
/// restrictions in `fq`.
fn build_query(author: &str, options: &SearchOptions) -> (String, String) {
    let mut q = format!("author:\"{}\"", author);
    match options.refereed {
        Some(true) => q.push_str(" property:refereed"),
        Some(false) => q.push_str(" property:notrefereed"),
        None => {}
    }

    let mut fq = String::from("database:(physics OR astronomy)");
    if let Some((start, end)) = options.years {
        fq.push_str(&format!(" year:{}-{}", start, end));
    }

    (q, fq)
}

/// Map HTTP failures to crate errors, authentication ones specially.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(AdsBibError::Auth(format!(
            "ADS rejected the API token ({})",
            status
        )));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AdsBibError::Api {
            code: i32::from(status.as_u16()),
            message: format!("ADS API error: {} - {}", status, body),
        });
    }
    Ok(response)
}

// === ADS API response types ===

#[derive(Debug, Deserialize)]
struct AdsResponse {
    response: AdsDocs,
}

#[derive(Debug, Deserialize)]
struct AdsDocs {
    #[serde(default)]
    docs: Vec<Paper>,
}
