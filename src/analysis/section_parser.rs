// src/analysis/section_parser.rs
//! Splits a generated analysis into numbered sections.

use super::match_score::{extract_match_score, MatchScore};
use super::prompts::CANONICAL_SECTION_TITLES;
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub title: String,
    pub content: String,
}

/// Which numbered lines open a new section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Any line starting with digits followed by a period.
    #[default]
    Numbered,
    /// Numbered lines whose title is one of the canonical section names.
    /// Other numbered lines, such as list items inside a section, stay content.
    Canonical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAnalysis {
    pub sections: Vec<AnalysisSection>,
    pub match_score: MatchScore,
}

/// Split `response` into sections and pull out the match score.
pub fn parse_analysis(response: &str, policy: HeaderPolicy) -> Result<ParsedAnalysis, ParseError> {
    let sections = split_sections(response, policy)?;
    let match_score = extract_match_score(response);
    Ok(ParsedAnalysis {
        sections,
        match_score,
    })
}

/// Walk the lines of `response`, opening a section at every header.
pub fn split_sections(
    response: &str,
    policy: HeaderPolicy,
) -> Result<Vec<AnalysisSection>, ParseError> {
    if response.trim().is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in response.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if is_section_header(line, policy) {
            if let Some((title, content)) = current.take() {
                sections.push(close_section(title, &content));
            }
            current = Some((line.to_string(), Vec::new()));
        } else if let Some((_, content)) = current.as_mut() {
            content.push(line);
        } else {
            debug!("Dropping content before first section: {}", line);
        }
    }

    if let Some((title, content)) = current {
        sections.push(close_section(title, &content));
    }

    debug!("Split analysis into {} sections", sections.len());
    Ok(sections)
}

fn close_section(title: String, content: &[&str]) -> AnalysisSection {
    AnalysisSection {
        title,
        content: content.join("\n").trim().to_string(),
    }
}

fn is_section_header(line: &str, policy: HeaderPolicy) -> bool {
    let Some(rest) = strip_number_prefix(line) else {
        return false;
    };
    match policy {
        HeaderPolicy::Numbered => true,
        HeaderPolicy::Canonical => is_canonical_title(rest),
    }
}

/// `"12. Title"` -> `Some(" Title")`; `None` unless the line starts with digits and a period.
fn strip_number_prefix(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.')
}

fn is_canonical_title(rest: &str) -> bool {
    let title = rest
        .trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == '_' || c == '#')
        .to_lowercase();
    CANONICAL_SECTION_TITLES
        .iter()
        .any(|canonical| title.starts_with(&canonical.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ANALYSIS: &str = "Here is the analysis you asked for.\n\n\
        1. Match Score: 78%\n\
        The resume covers most core requirements.\n\n\
        2. Key Skills Match:\n\
        - Rust, SQL present\n\
        - Kubernetes missing\n\
        3. Experience Alignment:\n\
        Five years of backend work.\n\
        4. Keywords Analysis:\n\
        Present: microservices\n\
        5. Specific Recommendations:\n\
        1. Add Kubernetes projects\n\
        2. Quantify impact\n\
        6. Format and Structure:\n\
        Clean single-column layout.";

    #[test]
    fn test_two_well_formed_sections() {
        let sections = split_sections("1. Title A\nbody1\n2. Title B\nbody2", HeaderPolicy::Numbered)
            .unwrap();
        assert_eq!(
            sections,
            vec![
                AnalysisSection {
                    title: "1. Title A".to_string(),
                    content: "body1".to_string(),
                },
                AnalysisSection {
                    title: "2. Title B".to_string(),
                    content: "body2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(
            split_sections("", HeaderPolicy::Numbered),
            Err(ParseError::EmptyResponse)
        );
        assert_eq!(
            split_sections(" \n\t\n", HeaderPolicy::Numbered),
            Err(ParseError::EmptyResponse)
        );
    }

    #[test]
    fn test_no_headers_yields_no_sections() {
        let sections =
            split_sections("Just some prose\nwith no numbering", HeaderPolicy::Numbered).unwrap();
        assert!(sections.is_empty());
    }

    #[test]
    fn test_repeated_headers_are_kept() {
        let sections = split_sections("1. A\nx\n1. A\ny", HeaderPolicy::Numbered).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "x");
        assert_eq!(sections[1].content, "y");
    }

    #[test]
    fn test_header_without_body_and_multi_digit_numbers() {
        let sections = split_sections("  12.Summary  \n13. Next\nline one\n\nline two", HeaderPolicy::Numbered)
            .unwrap();
        assert_eq!(sections[0].title, "12.Summary");
        assert_eq!(sections[0].content, "");
        assert_eq!(sections[1].content, "line one\nline two");
    }

    #[test]
    fn test_digits_without_period_are_content() {
        let sections = split_sections("1. Score\n2024 was a good year\n3) not a header", HeaderPolicy::Numbered)
            .unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "2024 was a good year\n3) not a header");
    }

    #[test]
    fn test_numbered_policy_splits_inner_lists() {
        let sections = split_sections(FULL_ANALYSIS, HeaderPolicy::Numbered).unwrap();
        assert_eq!(sections.len(), 8);
        assert_eq!(sections[5].title, "1. Add Kubernetes projects");
    }

    #[test]
    fn test_canonical_policy_keeps_inner_lists() {
        let sections = split_sections(FULL_ANALYSIS, HeaderPolicy::Canonical).unwrap();
        assert_eq!(sections.len(), 6);
        assert_eq!(sections[4].title, "5. Specific Recommendations:");
        assert_eq!(
            sections[4].content,
            "1. Add Kubernetes projects\n2. Quantify impact"
        );
    }

    #[test]
    fn test_canonical_policy_ignores_markdown_emphasis() {
        let sections =
            split_sections("1. **Match Score**: 60%\nok", HeaderPolicy::Canonical).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "1. **Match Score**: 60%");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_analysis(FULL_ANALYSIS, HeaderPolicy::Numbered).unwrap();
        let second = parse_analysis(FULL_ANALYSIS, HeaderPolicy::Numbered).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.match_score, MatchScore::Score(78));
    }
}
