//! Output document assembly and exports.
//!
//! Produces the text block embedded by whatever templating layer renders
//! the final document, and the affiliation-frequency CSV used by the
//! affiliation-analysis runs.

use crate::error::Result;
use crate::paper::Paper;
use crate::section::Section;
use std::collections::HashMap;
use std::path::Path;

/// Render the document body: a title, then every non-empty section under
/// its own heading. Empty sections are omitted entirely.
pub fn render_document(title: &str, sections: &[Section]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push('\n');

    for section in sections {
        if section.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&section.name);
        out.push('\n');
        out.push_str(&"-".repeat(section.name.chars().count()));
        out.push_str("\n\n");
        out.push_str(&section.render());
        out.push('\n');
    }

    out
}

/// Count affiliation-string frequencies across a paper list.
///
/// ADS marks missing affiliations with "-"; those and empty strings are
/// skipped. Sorted by descending count, then alphabetically for a stable
/// order.
pub fn affiliation_counts(papers: &[Paper]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for paper in papers {
        for aff in paper.aff.as_deref().unwrap_or_default() {
            let aff = aff.trim();
            if aff.is_empty() || aff == "-" {
                continue;
            }
            *counts.entry(aff.to_string()).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Write affiliation counts as a two-column CSV.
pub fn write_affiliation_csv(path: &Path, counts: &[(String, usize)]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["affiliation", "count"])?;
    for (affiliation, count) in counts {
        wtr.write_record([affiliation.as_str(), &count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Authorship;
    use crate::section::CitationLine;

    fn section(name: &str, lines: &[&str]) -> Section {
        let citations: Vec<CitationLine> = lines
            .iter()
            .map(|text| CitationLine {
                text: text.to_string(),
                year: Some(2022),
                major: true,
                researcher_index: Some(0),
            })
            .collect();
        Section::assemble(name, Authorship::All, &citations, &[])
    }

    #[test]
    fn test_render_document_skips_empty_sections() {
        let sections = vec![
            section("Refereed Publications", &["- line one"]),
            section("White Papers", &[]),
            section("Proceedings", &["- line two"]),
        ];
        let doc = render_document("Publications", &sections);
        assert!(doc.starts_with("Publications\n============\n"));
        assert!(doc.contains("Refereed Publications\n---------------------\n\n- line one\n"));
        assert!(doc.contains("Proceedings"));
        assert!(!doc.contains("White Papers"));
    }

    #[test]
    fn test_affiliation_counts_skip_missing_markers() {
        let papers = vec![
            Paper {
                aff: Some(vec![
                    "LESIA, Observatoire de Paris".to_string(),
                    "-".to_string(),
                ]),
                ..Default::default()
            },
            Paper {
                aff: Some(vec![
                    "LESIA, Observatoire de Paris".to_string(),
                    "STScI".to_string(),
                    "".to_string(),
                ]),
                ..Default::default()
            },
            Paper::default(),
        ];
        let counts = affiliation_counts(&papers);
        assert_eq!(
            counts,
            vec![
                ("LESIA, Observatoire de Paris".to_string(), 2),
                ("STScI".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_write_affiliation_csv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("affiliations.csv");
        let counts = vec![("LESIA".to_string(), 2), ("STScI".to_string(), 1)];
        write_affiliation_csv(&path, &counts).expect("write csv");
        let written = std::fs::read_to_string(&path).expect("read csv");
        assert_eq!(written, "affiliation,count\nLESIA,2\nSTScI,1\n");
    }
}
