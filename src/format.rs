//! Citation-line formatting.
//!
//! Turns raw ADS author strings into abbreviated "Last, F.M." form, renders
//! the truncated author list for a paper, and assembles the full citation
//! line clause by clause. Every optional bibliographic field that is absent
//! simply omits its clause.

use crate::paper::Paper;
use regex::Regex;

/// Shorten a researcher name ("Last, First") to the surname used for
/// highlighting and major/minor classification.
pub fn surname_short(researcher: &str) -> &str {
    researcher.split(',').next().unwrap_or(researcher).trim()
}

/// Normalize one raw author string into abbreviated form.
///
/// "Last, Given1 Given2-Given3" becomes "Last, G1. G2. -G3.". Hyphenated
/// given names are retokenized with a leading "-" so each part keeps its own
/// initial, and brace-enclosed diacritic escapes ("{\'E}ric") are kept whole
/// through the closing brace.
pub fn normalize_author(raw: &str) -> String {
    let (surname, given) = match raw.split_once(',') {
        Some((s, g)) => (s, g),
        None => (raw, "?"),
    };

    // "Jean-Pierre" -> "Jean -Pierre" so both parts tokenize separately
    let spaced = given.replace('-', " -");
    let mut initials: Vec<String> = spaced
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(abbreviate_token)
        .collect();

    if initials.is_empty() {
        // empty given-name portion ("Last,") degrades to the placeholder
        initials.push(abbreviate_token("?"));
    }

    format!("{}, {}", surname, initials.join(" "))
}

/// Abbreviate a single given-name token.
///
/// Callers must never pass a zero-length token; the split above filters them
/// out, so the empty-string arm is a pure guard.
fn abbreviate_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        None => String::new(),
        Some('-') => {
            // hyphen plus the initial of the following part
            let head: String = token.chars().take(2).collect();
            format!("{}.", head)
        }
        Some('{') => match token.find('}') {
            // keep the whole escape sequence through the closing brace
            Some(end) => format!("{}.", &token[..=end]),
            None => ".".to_string(),
        },
        Some(first) => format!("{}.", first),
    }
}

/// Rendered author list for one paper.
#[derive(Debug, Clone)]
pub struct RenderedAuthors {
    /// Joined display text, "et al." included when truncated
    pub text: String,
    /// True when the author list was cut at the display cutoff
    pub et_al: bool,
    /// Index of the target researcher within the displayed authors, if any.
    /// Carried explicitly so callers need not re-derive it from the text.
    pub researcher_index: Option<usize>,
}

/// Render the (possibly truncated) author list of a paper.
///
/// With no target researcher every author is normalized and listed in full.
/// With a target, only the first `cutoff` authors are kept, "et al." is
/// appended when more follow, and entries containing the researcher's
/// surname can be wrapped in a bold highlight marker.
pub fn render_author_list(
    authors: &[String],
    researcher: Option<&str>,
    cutoff: usize,
    highlight: bool,
) -> RenderedAuthors {
    let mut displayed: Vec<String> = Vec::new();
    let mut et_al = false;
    let mut researcher_index = None;

    match researcher {
        None => {
            displayed.extend(authors.iter().map(|a| normalize_author(a)));
        }
        Some(target) => {
            let short = surname_short(target);
            for (i, raw) in authors.iter().enumerate() {
                if i >= cutoff {
                    et_al = true;
                    break;
                }
                let normalized = normalize_author(raw);
                if normalized.contains(short) {
                    if researcher_index.is_none() {
                        researcher_index = Some(i);
                    }
                    if highlight {
                        displayed.push(format!("{{\\bf {}}}", normalized));
                        continue;
                    }
                }
                displayed.push(normalized);
            }
        }
    }

    // exactly two authors read better joined with "&"
    let text = if et_al {
        format!("{} et al.", displayed.join(" ; "))
    } else if authors.len() == 2 {
        displayed.join(" & ")
    } else {
        displayed.join(" ; ")
    };

    RenderedAuthors {
        text,
        et_al,
        researcher_index,
    }
}

/// Formatting knobs for [`citation_line`].
#[derive(Debug, Clone)]
pub struct LineOptions {
    /// Display cutoff K; also defines "major" authorship
    pub cutoff: usize,
    /// Wrap the target researcher's entry in a bold marker
    pub highlight: bool,
    /// Append a DOI hyperlink clause when the paper has a DOI
    pub doi_link: bool,
    /// Append an arXiv hyperlink clause when an arXiv id is found
    pub arxiv_link: bool,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            cutoff: 3,
            highlight: false,
            doi_link: true,
            arxiv_link: false,
        }
    }
}

/// Assemble the citation line for one paper.
///
/// Clause order matches the generated documents: authors, year, title,
/// venue/volume/page, DOI link, arXiv link, citation count. Absent fields
/// contribute nothing.
pub fn citation_line(paper: &Paper, researcher: Option<&str>, opts: &LineOptions) -> String {
    citation_line_rendered(paper, researcher, opts).0
}

/// [`citation_line`] variant that also returns the rendered author list,
/// so callers get the researcher's display index without re-deriving it
/// from the text.
pub fn citation_line_rendered(
    paper: &Paper,
    researcher: Option<&str>,
    opts: &LineOptions,
) -> (String, RenderedAuthors) {
    let rendered = render_author_list(&paper.author, researcher, opts.cutoff, opts.highlight);

    let year = paper.year.as_deref().unwrap_or("");
    let title = paper.first_title().unwrap_or("");

    let mut venue_parts: Vec<String> = Vec::new();
    if let Some(venue) = paper.venue.as_deref() {
        venue_parts.push(venue.to_string());
    }
    if let Some(volume) = paper.volume.as_deref() {
        venue_parts.push(volume.to_string());
    }
    if let Some(first_page) = paper.page.as_ref().and_then(|p| p.first()) {
        venue_parts.push(first_page.clone());
    }

    let mut out = format!("- {} ({}), {}", rendered.text, year, title);
    if !venue_parts.is_empty() {
        out.push_str(", ");
        out.push_str(&venue_parts.join(", "));
    }

    if opts.doi_link {
        if let Some(doi) = paper.doi.as_ref().and_then(|d| d.first()) {
            out.push_str(&format!(
                ", \\href{{https://doi.org/{}}}{{DOI Link}}",
                doi
            ));
        }
    }

    if opts.arxiv_link {
        if let Some(id) = arxiv_id(paper) {
            out.push_str(&format!(
                ", \\href{{https://arxiv.org/abs/{}}}{{arXiv}}",
                id
            ));
        }
    }

    if let Some(count) = paper.citation.as_ref().map(Vec::len) {
        if count == 1 {
            out.push_str(", 1 citation");
        } else if count > 1 {
            out.push_str(&format!(", {} citations", count));
        }
    }

    (out, rendered)
}

/// Find an arXiv id in the paper's identifier list.
///
/// Matches the explicit "arXiv:" prefix or the bare modern id shape
/// (NNNN.NNNN or NNNN.NNNNN).
fn arxiv_id(paper: &Paper) -> Option<String> {
    let bare = Regex::new(r"^\d{4}\.\d{4,5}$").ok()?;
    for ident in paper.identifier.as_deref().unwrap_or_default() {
        if let Some(id) = ident.strip_prefix("arXiv:") {
            return Some(id.to_string());
        }
        if bare.is_match(ident) {
            return Some(ident.clone());
        }
    }
    None
}
