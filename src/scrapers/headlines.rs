//! Filtering, de-duplication and record assembly for one source.

use crate::error::Result;
use crate::models::{HeadlineCandidate, HeadlineRecord, Source};
use crate::scrapers::selectors::{collect_candidates, pattern_for};
use crate::scrapers::urls::resolve_url;
use crate::utils::collapse_whitespace;
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, instrument};

/// A validated `(text, absolute url)` pair, not yet stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub text: String,
    pub url: String,
}

/// What one extraction pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Number of candidates the selector matched, before filtering.
    pub candidates: usize,
    pub records: Vec<HeadlineRecord>,
}

/// Reduce candidates to the headlines worth keeping.
///
/// A candidate survives when it has a link target and non-blank text, its
/// resolved URL contains `source.allowed_domain`, and no earlier survivor had
/// the same text. Survivors keep first-encounter order.
pub fn filter_candidates(candidates: &[HeadlineCandidate], source: &Source) -> Vec<Headline> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let href = candidate.href.as_deref().filter(|h| !h.is_empty())?;
            let text = candidate
                .text
                .as_deref()
                .map(collapse_whitespace)
                .filter(|t| !t.is_empty())?;
            let url = resolve_url(href, &source.base_url)?;
            if !url.contains(&source.allowed_domain) {
                debug!(%url, source = %source.name, "Dropping off-domain link");
                return None;
            }
            Some(Headline { text, url })
        })
        .unique_by(|headline| headline.text.clone())
        .collect()
}

/// Stamp every headline with the run timestamp.
pub fn assemble_records(headlines: Vec<Headline>, timestamp: &str) -> Vec<HeadlineRecord> {
    headlines
        .into_iter()
        .map(|headline| HeadlineRecord {
            timestamp: timestamp.to_string(),
            headline_text: headline.text,
            url: headline.url,
        })
        .collect()
}

/// Parse `html` and run the full selection → resolution → filtering →
/// stamping pipeline for `source`.
#[instrument(level = "info", skip_all, fields(source = %source.name))]
pub fn extract_headlines(html: &str, source: &Source, timestamp: &str) -> Result<Extraction> {
    let document = Html::parse_document(html);
    let pattern = pattern_for(source);
    let candidates = collect_candidates(&document, &pattern)?;
    let headlines = filter_candidates(&candidates, source);
    debug!(
        candidates = candidates.len(),
        kept = headlines.len(),
        "Filtered headline candidates"
    );
    Ok(Extraction {
        candidates: candidates.len(),
        records: assemble_records(headlines, timestamp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectorPattern;
    use crate::scrapers::urls::is_absolute;
    use std::collections::HashSet;

    const STAMP: &str = "2025-05-06 20:30:00";

    fn site() -> Source {
        Source::new("Site", "https://site.com/", "site.com")
    }

    fn cand(href: Option<&str>, text: Option<&str>) -> HeadlineCandidate {
        HeadlineCandidate::new(href, text)
    }

    fn noisy_candidates() -> Vec<HeadlineCandidate> {
        vec![
            cand(Some("/politics/senate"), Some("Senate passes bill")),
            cand(Some("https://ads.example.net/click?id=9"), Some("Buy gold now")),
            cand(Some("#top"), Some("Back to top")),
            cand(Some("https://site.com/world/summit"), Some("  Summit   opens ")),
            cand(None, Some("Orphan text")),
            cand(Some("/politics/senate-2"), Some("Senate passes bill")),
            cand(Some("/video"), Some("")),
            cand(Some("//cdn.site.com/live"), Some("Live coverage")),
            cand(Some("mailto:tips@site.com"), Some("Send a tip")),
            cand(Some("../opinion/column"), Some("Column")),
        ]
    }

    #[test]
    fn test_scenario_duplicate_text_dropped() {
        let candidates = vec![
            cand(Some("/a"), Some("Headline A")),
            cand(Some("https://site.com/b"), Some("Headline B")),
            cand(Some("/a"), Some("Headline A")),
        ];
        let kept = filter_candidates(&candidates, &site());
        assert_eq!(
            kept,
            vec![
                Headline {
                    text: "Headline A".into(),
                    url: "https://site.com/a".into()
                },
                Headline {
                    text: "Headline B".into(),
                    url: "https://site.com/b".into()
                },
            ]
        );
    }

    #[test]
    fn test_scenario_missing_href_or_text_dropped() {
        let candidates = vec![
            cand(None, Some("Has text")),
            cand(Some(""), Some("Empty href")),
            cand(Some("/no-text"), None),
            cand(Some("/blank-text"), Some("   \n ")),
        ];
        assert!(filter_candidates(&candidates, &site()).is_empty());
    }

    #[test]
    fn test_scenario_off_domain_dropped() {
        let candidates = vec![cand(
            Some("https://adnetwork.io/track?u=1"),
            Some("Unique sponsored headline"),
        )];
        assert!(filter_candidates(&candidates, &site()).is_empty());
    }

    #[test]
    fn test_first_text_wins_even_with_different_url() {
        let candidates = vec![
            cand(Some("/first"), Some("Same")),
            cand(Some("/second"), Some("Same")),
        ];
        let kept = filter_candidates(&candidates, &site());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "https://site.com/first");
    }

    #[test]
    fn test_noisy_page_properties() {
        let source = site();
        let candidates = noisy_candidates();
        let kept = filter_candidates(&candidates, &source);

        let texts: Vec<&str> = kept.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Senate passes bill", "Summit opens", "Live coverage", "Column"]
        );

        let unique: HashSet<&str> = texts.iter().copied().collect();
        assert_eq!(unique.len(), kept.len());
        for headline in &kept {
            assert!(headline.url.contains(&source.allowed_domain), "{}", headline.url);
            assert!(is_absolute(&headline.url), "{}", headline.url);
        }
    }

    #[test]
    fn test_order_follows_first_encounter() {
        let candidates = noisy_candidates();
        let kept = filter_candidates(&candidates, &site());
        let ranks: Vec<usize> = kept
            .iter()
            .map(|h| {
                candidates
                    .iter()
                    .position(|c| {
                        c.text.as_deref().map(collapse_whitespace).as_deref() == Some(h.text.as_str())
                    })
                    .unwrap()
            })
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]), "{ranks:?}");
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let source = site();
        let once = filter_candidates(&noisy_candidates(), &source);
        let replay: Vec<HeadlineCandidate> = once
            .iter()
            .map(|h| cand(Some(&h.url), Some(&h.text)))
            .collect();
        let twice = filter_candidates(&replay, &source);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_assemble_records_shares_timestamp() {
        let kept = filter_candidates(&noisy_candidates(), &site());
        let records = assemble_records(kept, STAMP);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.timestamp == STAMP));
    }

    #[test]
    fn test_extract_headlines_from_html() {
        let html = r#"
            <html><body>
              <header><a href="/">The Site</a></header>
              <a href="/news/one">First story</a>
              <a href="https://partner.example.com/x">Partner story</a>
              <a href="/news/one-again">First story</a>
              <a href="/news/two"> Second
                 story </a>
            </body></html>
        "#;
        let extraction = extract_headlines(html, &site(), STAMP).unwrap();
        assert_eq!(extraction.candidates, 5);
        assert_eq!(
            extraction.records,
            vec![
                HeadlineRecord {
                    timestamp: STAMP.into(),
                    headline_text: "The Site".into(),
                    url: "https://site.com/".into(),
                },
                HeadlineRecord {
                    timestamp: STAMP.into(),
                    headline_text: "First story".into(),
                    url: "https://site.com/news/one".into(),
                },
                HeadlineRecord {
                    timestamp: STAMP.into(),
                    headline_text: "Second story".into(),
                    url: "https://site.com/news/two".into(),
                },
            ]
        );
    }

    #[test]
    fn test_extract_headlines_empty_page() {
        let extraction = extract_headlines("<html></html>", &site(), STAMP).unwrap();
        assert_eq!(extraction.candidates, 0);
        assert!(extraction.records.is_empty());
    }

    #[test]
    fn test_extract_headlines_bad_custom_selector() {
        let source = site().with_selector(SelectorPattern::Css("a[".into()));
        assert!(extract_headlines("<a href='/x'>x</a>", &source, STAMP).is_err());
    }
}
