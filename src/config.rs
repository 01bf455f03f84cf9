//! Source configuration and the per-run context.
//!
//! Sources come from a YAML file when one is given, otherwise from the
//! built-in outlet list. A sources file looks like:
//!
//! ```yaml
//! sources:
//!   - name: Fox News
//!     base_url: https://www.foxnews.com/
//!     allowed_domain: foxnews.com
//!     selector: heading_anchors
//!   - name: Local Gazette
//!     base_url: https://gazette.example.org/
//!     allowed_domain: gazette.example.org
//!     selector:
//!       css: "div.story-card a"
//! ```

use crate::error::{HarvestError, Result};
use crate::models::{SelectorPattern, Source};
use crate::scrapers::urls::is_absolute;
use crate::utils::slugify;
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_TIMEZONE: &str = "Asia/Manila";

/// Everything a run needs, built once and borrowed by every source iteration.
pub struct RunContext<F, S> {
    pub sources: Vec<Source>,
    pub timezone: Tz,
    pub fetcher: F,
    pub sink: S,
}

impl<F, S> RunContext<F, S> {
    pub fn new(sources: Vec<Source>, timezone: Tz, fetcher: F, sink: S) -> Self {
        Self {
            sources,
            timezone,
            fetcher,
            sink,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    sources: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    name: String,
    base_url: String,
    allowed_domain: String,
    #[serde(default)]
    selector: Option<SelectorSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SelectorSpec {
    Named(NamedSelector),
    Css { css: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NamedSelector {
    AllAnchors,
    HeadingAnchors,
    SectionContentAnchors,
}

impl From<SelectorSpec> for SelectorPattern {
    fn from(spec: SelectorSpec) -> Self {
        match spec {
            SelectorSpec::Named(NamedSelector::AllAnchors) => SelectorPattern::AllAnchors,
            SelectorSpec::Named(NamedSelector::HeadingAnchors) => SelectorPattern::HeadingAnchors,
            SelectorSpec::Named(NamedSelector::SectionContentAnchors) => {
                SelectorPattern::SectionContentAnchors
            }
            SelectorSpec::Css { css } => SelectorPattern::Css(css),
        }
    }
}

/// The outlets scraped when no sources file is given.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new(
            "Gateway Pundit",
            "https://www.thegatewaypundit.com/",
            "gatewaypundit.com",
        ),
        Source::new("Breitbart", "https://www.breitbart.com/", "breitbart.com"),
        Source::new("Townhall", "https://townhall.com/", "townhall.com"),
        Source::new("Fox News", "https://www.foxnews.com/", "foxnews.com"),
        Source::new("New York Post", "https://nypost.com/", "nypost.com"),
    ]
}

/// Parse a sources document.
pub fn parse_sources(yaml: &str) -> Result<Vec<Source>> {
    let file: SourcesFile = serde_yaml::from_str(yaml)?;
    let sources: Vec<Source> = file
        .sources
        .into_iter()
        .map(|entry| {
            let source = Source::new(
                entry.name.trim(),
                entry.base_url.trim(),
                entry.allowed_domain.trim(),
            );
            match entry.selector {
                Some(spec) => source.with_selector(spec.into()),
                None => source,
            }
        })
        .collect();
    validate_sources(&sources)?;
    Ok(sources)
}

/// Load sources from `path`, or fall back to [`default_sources`].
#[instrument(level = "info")]
pub async fn load_sources(path: Option<&str>) -> Result<Vec<Source>> {
    let Some(path) = path else {
        info!("Using built-in sources");
        return Ok(default_sources());
    };
    let yaml = tokio::fs::read_to_string(Path::new(path))
        .await
        .map_err(|e| HarvestError::config(format!("cannot read sources file {path}: {e}")))?;
    let sources = parse_sources(&yaml)?;
    info!(count = sources.len(), "Loaded sources file");
    Ok(sources)
}

/// Reject configurations a run cannot honour.
///
/// Names must stay distinct after [`slugify`], since the CSV sink derives its
/// file names that way and two sources must never share a destination.
pub fn validate_sources(sources: &[Source]) -> Result<()> {
    if sources.is_empty() {
        return Err(HarvestError::config("no sources configured"));
    }
    let mut seen = HashSet::new();
    let mut slugs: HashMap<String, &str> = HashMap::new();
    for source in sources {
        if source.name.is_empty() {
            return Err(HarvestError::config("source with empty name"));
        }
        if !seen.insert(source.name.to_lowercase()) {
            return Err(HarvestError::config(format!(
                "duplicate source name '{}'",
                source.name
            )));
        }
        let slug = slugify(&source.name);
        if slug.is_empty() {
            return Err(HarvestError::config(format!(
                "source name '{}' has no characters usable as a destination name",
                source.name
            )));
        }
        if let Some(previous) = slugs.insert(slug.clone(), &source.name) {
            return Err(HarvestError::config(format!(
                "source names '{previous}' and '{}' both map to destination '{slug}'",
                source.name
            )));
        }
        if !is_absolute(&source.base_url) || Url::parse(&source.base_url).is_err() {
            return Err(HarvestError::config(format!(
                "source '{}' has invalid base_url '{}'",
                source.name, source.base_url
            )));
        }
        if source.allowed_domain.is_empty() {
            return Err(HarvestError::config(format!(
                "source '{}' has empty allowed_domain",
                source.name
            )));
        }
    }
    Ok(())
}

/// Parse an IANA zone name such as `Asia/Manila`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| HarvestError::config(format!("unknown timezone '{name}': {e}")))
}
