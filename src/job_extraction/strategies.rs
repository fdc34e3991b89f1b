// src/job_extraction/strategies.rs
//! Ordered field strategies for job-posting pages.
//!
//! Each field has a chain of pure `fn(&Html) -> Option<String>` probes,
//! ordered from site-specific markers to generic page structure. The first
//! probe whose output passes the field's acceptance check wins.

use scraper::{ElementRef, Html, Selector};

use crate::utils::{char_len, collapse_to_line, normalize_whitespace};

/// Minimum number of characters a description must have to be usable.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

/// Elements whose text starts on its own line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre",
    "section", "table", "td", "th", "tr", "ul",
];

/// Elements whose contents are never visible text.
const NON_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Subtrees dropped by the whole-page fallback.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer",
];

pub struct Strategy {
    pub name: &'static str,
    pub probe: fn(&Html) -> Option<String>,
}

pub const TITLE_STRATEGIES: &[Strategy] = &[
    Strategy { name: "h1", probe: title_from_h1 },
    Strategy { name: "og:title", probe: title_from_og_meta },
    Strategy { name: "title", probe: title_from_title_tag },
    Strategy { name: "[data-test=job-title]", probe: title_from_data_attr },
];

pub const COMPANY_STRATEGIES: &[Strategy] = &[
    Strategy { name: "[data-test=company-name]", probe: company_from_data_attr },
    Strategy { name: "og:site_name", probe: company_from_og_meta },
    Strategy { name: ".company-name", probe: company_from_company_class },
    Strategy { name: ".employer-name", probe: company_from_employer_class },
];

pub const DESCRIPTION_STRATEGIES: &[Strategy] = &[
    Strategy { name: "[data-test=job-description]", probe: description_from_data_attr },
    Strategy { name: ".description__text", probe: description_from_linkedin_class },
    Strategy { name: ".job-description", probe: description_from_job_class },
    Strategy { name: "article", probe: description_from_article },
    Strategy { name: "main", probe: description_from_main },
    Strategy { name: ".description", probe: description_from_description_class },
];

/// Run a chain and return the first accepted value with the strategy name.
pub fn first_accepted(
    document: &Html,
    chain: &[Strategy],
    accept: impl Fn(&str) -> bool,
) -> Option<(&'static str, String)> {
    chain.iter().find_map(|strategy| {
        (strategy.probe)(document)
            .filter(|value| accept(value))
            .map(|value| (strategy.name, value))
    })
}

pub fn non_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn long_enough(value: &str) -> bool {
    char_len(value) > MIN_DESCRIPTION_CHARS
}

/// `<main>` text with script, style, nav, header and footer subtrees removed.
pub fn main_without_boilerplate(document: &Html) -> Option<String> {
    let selector = Selector::parse("main").ok()?;
    let main = document.select(&selector).next()?;
    let mut raw = String::new();
    collect_text(main, BOILERPLATE_TAGS, &mut raw);
    Some(normalize_whitespace(&raw))
}

fn title_from_h1(document: &Html) -> Option<String> {
    first_text(document, "h1")
}

fn title_from_og_meta(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[property="og:title"]"#)
}

fn title_from_title_tag(document: &Html) -> Option<String> {
    first_text(document, "title")
}

fn title_from_data_attr(document: &Html) -> Option<String> {
    first_text(document, r#"[data-test="job-title"]"#)
}

fn company_from_data_attr(document: &Html) -> Option<String> {
    first_text(document, r#"[data-test="company-name"]"#)
}

fn company_from_og_meta(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[property="og:site_name"]"#)
}

fn company_from_company_class(document: &Html) -> Option<String> {
    first_text(document, ".company-name")
}

fn company_from_employer_class(document: &Html) -> Option<String> {
    first_text(document, ".employer-name")
}

fn description_from_data_attr(document: &Html) -> Option<String> {
    all_text(document, r#"[data-test="job-description"]"#)
}

fn description_from_linkedin_class(document: &Html) -> Option<String> {
    all_text(document, ".description__text")
}

fn description_from_job_class(document: &Html) -> Option<String> {
    all_text(document, ".job-description")
}

fn description_from_article(document: &Html) -> Option<String> {
    all_text(document, "article")
}

fn description_from_main(document: &Html) -> Option<String> {
    all_text(document, "main")
}

fn description_from_description_class(document: &Html) -> Option<String> {
    all_text(document, ".description")
}

/// Single-line text of the first matching element.
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    let mut raw = String::new();
    collect_text(element, NON_TEXT_TAGS, &mut raw);
    Some(collapse_to_line(&raw))
}

/// `content` attribute of the first matching `<meta>`.
fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr("content"))
        .map(collapse_to_line)
}

/// Normalised text of every matching element, in document order.
fn all_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let mut raw = String::new();
    let mut matched = false;
    for element in document.select(&selector) {
        matched = true;
        collect_text(element, NON_TEXT_TAGS, &mut raw);
        raw.push('\n');
    }
    matched.then(|| normalize_whitespace(&raw))
}

fn collect_text(element: ElementRef<'_>, skip: &[&str], out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if skip.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(child_element, skip, out);
            if block {
                out.push('\n');
            }
        }
    }
}
