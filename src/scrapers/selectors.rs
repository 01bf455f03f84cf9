//! Per-site selector dispatch.
//!
//! Outlets with known homepage markup get a narrower [`SelectorPattern`];
//! anything else falls back to [`SelectorPattern::AllAnchors`] and leans on the
//! domain gate in [`super::headlines`] to drop navigation and ad links.

use crate::error::{HarvestError, Result};
use crate::models::{HeadlineCandidate, SelectorPattern, Source};
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

static SITE_SELECTORS: Lazy<HashMap<&'static str, SelectorPattern>> = Lazy::new(|| {
    HashMap::from([
        ("gateway pundit", SelectorPattern::HeadingAnchors),
        ("breitbart", SelectorPattern::SectionContentAnchors),
        ("townhall", SelectorPattern::HeadingAnchors),
        ("fox news", SelectorPattern::HeadingAnchors),
    ])
});

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Pick the pattern for a source: explicit config, then the site table, then
/// the match-all fallback.
pub fn pattern_for(source: &Source) -> SelectorPattern {
    if let Some(explicit) = &source.selector {
        return explicit.clone();
    }
    SITE_SELECTORS
        .get(source.name.to_lowercase().as_str())
        .cloned()
        .unwrap_or(SelectorPattern::AllAnchors)
}

/// Collect candidates matching `pattern`, in document order.
///
/// Zero matches is a normal outcome. Only an unparsable custom selector is an
/// error.
pub fn collect_candidates(
    document: &Html,
    pattern: &SelectorPattern,
) -> Result<Vec<HeadlineCandidate>> {
    let selector = Selector::parse(pattern.css()).map_err(|e| HarvestError::Parse {
        message: format!("invalid selector '{}': {e}", pattern.css()),
    })?;

    let candidates: Vec<HeadlineCandidate> = document
        .select(&selector)
        .map(|element| to_candidate(&element))
        .collect();

    debug!(
        pattern = pattern.label(),
        count = candidates.len(),
        "Collected headline candidates"
    );
    Ok(candidates)
}

fn to_candidate(element: &ElementRef) -> HeadlineCandidate {
    // Custom selectors may land on a heading or card; borrow its first link.
    let href = if element.value().name() == "a" {
        element.value().attr("href")
    } else {
        element
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
    };
    let text = collapse_whitespace(&element.text().collect::<String>());
    HeadlineCandidate::new(href, Some(text.as_str()).filter(|t| !t.is_empty()))
}
