//! # rustadsbib
//!
//! NASA ADS Publication List Generator - Rust CLI
//!
//! ## Modules
//!
//! - [`ads`] - NASA ADS search API client
//! - [`paper`] - Paper records and bibcode dedup
//! - [`format`] - Name normalization and citation-line formatting
//! - [`filter`] - Authorship classifier, keyword filters, clean table
//! - [`pipeline`] - Per-section filter chain over fetched papers
//! - [`section`] - Section assembly with manual injections
//! - [`config`] - JSON run configuration and token resolution
//! - [`document`] - Document rendering and affiliation CSV export
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustadsbib::ads::{AdsClient, SearchOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AdsClient::new("my-token")?;
//!     let papers = client.search("Mazoyer, Johan", &SearchOptions::default()).await?;
//!     println!("Found {} papers", papers.len());
//!     Ok(())
//! }
//! ```

pub mod ads;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod format;
pub mod paper;
pub mod pipeline;
pub mod section;

pub use error::{AdsBibError, Result};
