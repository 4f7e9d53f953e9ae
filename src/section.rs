//! Section assembly.
//!
//! A section collects the citation lines that survived the filter chain for
//! one category and weaves in operator-supplied manual injections: lines
//! anchored either "at the end" (emitted at the head of the section, before
//! any paper-derived line) or at a year, inserted immediately before the
//! first paper whose year is strictly less than the anchor.

use crate::filter::Authorship;
use serde::{Deserialize, Serialize};

/// One formatted output line, with the metadata the assembler orders by.
#[derive(Debug, Clone)]
pub struct CitationLine {
    /// Fully filtered and cleaned text; never empty once collected
    pub text: String,
    /// Source paper year, used for injection anchoring and group sorting
    pub year: Option<i32>,
    /// Whether the target researcher made the displayed author list
    pub major: bool,
    /// Researcher's index within the displayed authors, when present
    pub researcher_index: Option<usize>,
}

/// Where a manual injection lands in the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Emitted once at the head of the section
    End,
    /// Inserted before the first paper with year strictly below this
    Year(i32),
}

/// An operator-supplied line that bypasses the query/filter pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injection {
    pub anchor: Anchor,
    pub text: String,
}

/// A named, assembled section.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub authorship: Authorship,
    /// Final line order, injections already placed
    pub lines: Vec<String>,
}

impl Section {
    /// Assemble a section from filtered citation lines and its injections.
    ///
    /// Papers keep the descending-pubdate order of the query. Each year
    /// injection fires at most once, at the first qualifying position; one
    /// that never qualifies is silently dropped, matching the long-standing
    /// behavior callers may rely on.
    pub fn assemble(
        name: impl Into<String>,
        authorship: Authorship,
        citations: &[CitationLine],
        injections: &[Injection],
    ) -> Self {
        let mut lines: Vec<String> = Vec::new();
        let mut fired = vec![false; injections.len()];

        for (i, injection) in injections.iter().enumerate() {
            if injection.anchor == Anchor::End {
                lines.push(injection.text.clone());
                fired[i] = true;
            }
        }

        for citation in citations {
            if citation.text.is_empty() {
                continue;
            }
            if let Some(paper_year) = citation.year {
                for (i, injection) in injections.iter().enumerate() {
                    if fired[i] {
                        continue;
                    }
                    if let Anchor::Year(anchor_year) = injection.anchor {
                        if paper_year < anchor_year {
                            lines.push(injection.text.clone());
                            fired[i] = true;
                        }
                    }
                }
            }
            lines.push(citation.text.clone());
        }

        Self {
            name: name.into(),
            authorship,
            lines,
        }
    }

    /// True when no paper passed the filters and no injection landed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serialize the section body: lines separated by blank lines.
    ///
    /// An empty section renders as the empty string and is omitted from the
    /// document entirely.
    pub fn render(&self) -> String {
        self.lines.join("\n\n")
    }
}
