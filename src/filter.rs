//! Line-level filters.
//!
//! These are pass-through functions in the original pipeline order:
//! authorship classification, reject keywords, select keywords, then the
//! clean/escape substitution table. A discarded line becomes the empty
//! string; downstream stages drop empty lines.

use crate::paper::Paper;
use serde::{Deserialize, Serialize};

/// Which papers a section keeps, based on the target researcher's position
/// in the rendered author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authorship {
    /// Researcher appears within the displayed (first K) authors
    Major,
    /// Researcher does not appear within the displayed authors
    Minor,
    /// No authorship filtering
    #[default]
    All,
}

/// Gate a rendered line on the researcher's presence.
///
/// The decision is a substring search over the already-rendered text, so it
/// is bound to the cutoff used when rendering: the surname only appears in
/// the line when the researcher made the displayed list.
pub fn filter_authorship(line: String, mode: Authorship, surname_short: &str) -> String {
    let present = line.contains(surname_short);
    match mode {
        Authorship::All => line,
        Authorship::Major if present => line,
        Authorship::Minor if !present => line,
        _ => String::new(),
    }
}

/// Discard the line if any reject keyword is a substring of it.
///
/// An absent list is a no-op.
pub fn reject_keywords(line: String, reject: Option<&[String]>) -> String {
    let Some(keywords) = reject else {
        return line;
    };
    if keywords.iter().any(|kw| line.contains(kw.as_str())) {
        return String::new();
    }
    line
}

/// Discard the line unless at least one select keyword is a substring of it.
///
/// An absent list is a no-op.
pub fn select_keywords(line: String, select: Option<&[String]>) -> String {
    let Some(keywords) = select else {
        return line;
    };
    if keywords.iter().any(|kw| line.contains(kw.as_str())) {
        return line;
    }
    String::new()
}

/// Ordered literal substitutions applied after filtering.
///
/// Markup fix-ups and diacritic transliteration for strings the output
/// format chokes on. No replacement re-introduces an earlier pattern, so
/// applying the table twice equals applying it once.
const CLEAN_TABLE: &[(&str, &str)] = &[
    ("{\\ensuremath{<}}SUB{\\ensuremath{>}}", ""),
    ("{\\ensuremath{<}}/SUB{\\ensuremath{>}}", ""),
    ("<SUB>", ""),
    ("</SUB>", ""),
    ("─", "-"),
    ("\\ensuremath", ""),
    ("{\\'e}", "é"),
    ("{\\^e}", "ê"),
    ("{\\`e}", "è"),
    ("{\\'E}", "É"),
    ("{\\^a}", "â"),
];

/// Apply the clean/escape table to a rendered line.
pub fn clean_line(line: &str) -> String {
    let mut out = line.to_string();
    for (pattern, replacement) in CLEAN_TABLE {
        if out.contains(pattern) {
            out = out.replace(pattern, replacement);
        }
    }
    out
}

/// Abstract keyword gate applied before rendering.
///
/// With a keyword list configured, a paper passes only when it has an
/// abstract containing at least one keyword (case-insensitive). Without a
/// list every paper passes.
pub fn passes_abstract_gate(paper: &Paper, keywords: Option<&[String]>) -> bool {
    let Some(keywords) = keywords else {
        return true;
    };
    let Some(abstract_text) = paper.abstract_text.as_deref() else {
        return false;
    };
    let lowered = abstract_text.to_lowercase();
    keywords.iter().any(|kw| lowered.contains(&kw.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_authorship_major_requires_surname() {
        let line = "- Doe, B. & Smith, A. (2022), Title".to_string();
        assert_eq!(
            filter_authorship(line.clone(), Authorship::Major, "Doe"),
            line
        );
        assert_eq!(filter_authorship(line, Authorship::Major, "Vader"), "");
    }

    #[test]
    fn test_authorship_minor_requires_absence() {
        let line = "- Smith, A. ; Jones, C. et al. (2022), Title".to_string();
        assert_eq!(
            filter_authorship(line.clone(), Authorship::Minor, "Doe"),
            line
        );
        assert_eq!(filter_authorship(line, Authorship::Minor, "Smith"), "");
    }

    #[test]
    fn test_authorship_all_passes_everything() {
        let line = "- Anyone (2022)".to_string();
        assert_eq!(filter_authorship(line.clone(), Authorship::All, "Doe"), line);
    }

    #[test]
    fn test_authorship_is_idempotent() {
        let line = "- Doe, B. (2022), Title".to_string();
        let once = filter_authorship(line, Authorship::Major, "Doe");
        let twice = filter_authorship(once.clone(), Authorship::Major, "Doe");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reject_keywords() {
        let reject = strings(&["VizieR", "arXiv e-prints"]);
        assert_eq!(
            reject_keywords("paper in VizieR catalog".to_string(), Some(&reject)),
            ""
        );
        let clean = "paper in ApJ".to_string();
        assert_eq!(reject_keywords(clean.clone(), Some(&reject)), clean);
        assert_eq!(reject_keywords(clean.clone(), None), clean);
    }

    #[test]
    fn test_select_keywords() {
        let select = strings(&["SPIE"]);
        assert_eq!(
            select_keywords("Proc. SPIE 12184".to_string(), Some(&select)),
            "Proc. SPIE 12184"
        );
        assert_eq!(select_keywords("ApJ 931".to_string(), Some(&select)), "");
        assert_eq!(select_keywords("ApJ 931".to_string(), None), "ApJ 931");
    }

    #[test]
    fn test_reject_wins_over_select() {
        // reject is applied first, so a line matching both lists is dropped
        let reject = strings(&["VizieR"]);
        let select = strings(&["VizieR"]);
        let line = "VizieR Online Data Catalog".to_string();
        let after = select_keywords(reject_keywords(line, Some(&reject)), Some(&select));
        assert_eq!(after, "");
    }

    #[test]
    fn test_clean_line_substitutions() {
        assert_eq!(clean_line("H<SUB>2</SUB>O"), "H2O");
        assert_eq!(
            clean_line("flux{\\ensuremath{<}}SUB{\\ensuremath{>}}0"),
            "flux0"
        );
        assert_eq!(clean_line("Gal{\\'e}rie"), "Galérie");
        assert_eq!(clean_line("unchanged"), "unchanged");
    }

    #[test]
    fn test_clean_line_is_idempotent() {
        let inputs = [
            "H<SUB>2</SUB>O and {\\'E}. Gendron",
            "a─b \\ensuremath{\\mu}m",
            "plain line",
        ];
        for input in inputs {
            let once = clean_line(input);
            assert_eq!(clean_line(&once), once);
        }
    }

    #[test]
    fn test_abstract_gate() {
        let mut paper = Paper {
            abstract_text: Some("We image an Exoplanet around a nearby star.".to_string()),
            ..Default::default()
        };
        let keywords = strings(&["exoplanet", "disk"]);
        assert!(passes_abstract_gate(&paper, Some(&keywords)));

        paper.abstract_text = Some("Stellar interior models.".to_string());
        assert!(!passes_abstract_gate(&paper, Some(&keywords)));

        paper.abstract_text = None;
        assert!(!passes_abstract_gate(&paper, Some(&keywords)));
        assert!(passes_abstract_gate(&paper, None));
    }
}
