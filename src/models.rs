//! Data models shared by the extraction pipeline, the sinks and the runner.
//!
//! - [`Source`]: one configured news outlet
//! - [`SelectorPattern`]: how candidate headline anchors are picked out of a page
//! - [`HeadlineCandidate`]: an anchor seen in the parsed document, before validation
//! - [`HeadlineRecord`]: a validated `(timestamp, text, url)` row
//! - [`SourceReport`] / [`RunReport`]: what a run tells its invoker

use serde::Serialize;

/// Column labels written as the first row of every destination.
pub const HEADER_ROW: [&str; 3] = ["Date", "Headline", "Link"];

/// A news outlet to scrape.
///
/// `name` doubles as the destination identifier in the sink (worksheet title
/// or CSV file stem), so it must be unique within a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub base_url: String,
    /// Substring every kept headline URL must contain.
    pub allowed_domain: String,
    /// Explicit selector; `None` defers to the built-in site table.
    pub selector: Option<SelectorPattern>,
}

impl Source {
    pub fn new(name: &str, base_url: &str, allowed_domain: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            allowed_domain: allowed_domain.to_string(),
            selector: None,
        }
    }

    pub fn with_selector(mut self, selector: SelectorPattern) -> Self {
        self.selector = Some(selector);
        self
    }
}

/// Structural pattern used to select candidate headline anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPattern {
    /// Every `<a>` in the document. Broad; relies on the domain gate for noise.
    AllAnchors,
    /// Anchors inside headings or elements whose class marks them as a title.
    HeadingAnchors,
    /// Anchors inside article/section content blocks.
    SectionContentAnchors,
    /// A caller-supplied CSS selector.
    Css(String),
}

impl SelectorPattern {
    /// The CSS selector text for this pattern.
    pub fn css(&self) -> &str {
        match self {
            Self::AllAnchors => "a",
            Self::HeadingAnchors => {
                "h1 a, h2 a, h3 a, h4 a, [class*='title'] a, a[class*='title'], \
                 [class*='headline'] a, a[class*='headline']"
            }
            Self::SectionContentAnchors => {
                "article a, section a, [class*='content'] a, [class*='story'] a"
            }
            Self::Css(css) => css.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::AllAnchors => "all_anchors",
            Self::HeadingAnchors => "heading_anchors",
            Self::SectionContentAnchors => "section_content_anchors",
            Self::Css(_) => "css",
        }
    }
}

/// An anchor-like element as found in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineCandidate {
    pub href: Option<String>,
    pub text: Option<String>,
}

impl HeadlineCandidate {
    pub fn new(href: Option<&str>, text: Option<&str>) -> Self {
        Self {
            href: href.map(str::to_string),
            text: text.map(str::to_string),
        }
    }
}

/// One validated headline, ready to be written as a sink row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlineRecord {
    /// Run-start time, identical for every record of a run.
    pub timestamp: String,
    pub headline_text: String,
    pub url: String,
}

impl HeadlineRecord {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.headline_text.clone(),
            self.url.clone(),
        ]
    }
}

/// How processing of a single source ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// Destination was rewritten; `rows == 0` is the benign "no headlines" case.
    Harvested { candidates: usize, rows: usize },
    Failed { kind: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Failed { .. })
    }
}

/// Everything a run produced: per-source status plus every kept record in
/// source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub started_at: String,
    pub sources: Vec<SourceReport>,
    pub records: Vec<HeadlineRecord>,
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_failed()).count()
    }
}
