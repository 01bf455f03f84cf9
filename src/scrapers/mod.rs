//! Headline extraction from a homepage's HTML.
//!
//! Extraction for one source runs in three steps:
//!
//! 1. **Selection** ([`selectors`]): pick candidate anchors with the source's
//!    [`SelectorPattern`](crate::models::SelectorPattern)
//! 2. **Resolution** ([`urls`]): turn each raw `href` into an absolute URL
//! 3. **Filtering** ([`headlines`]): drop empty, off-domain and repeated
//!    headlines, then stamp survivors with the run timestamp
//!
//! # Built-in site table
//!
//! | Source | Pattern |
//! |--------|---------|
//! | Gateway Pundit | heading anchors |
//! | Breitbart | section content anchors |
//! | Townhall | heading anchors |
//! | Fox News | heading anchors |
//! | anything else | all anchors |
//!
//! Extraction is pure: no network access happens here.

pub mod headlines;
pub mod selectors;
pub mod urls;

pub use headlines::{Extraction, extract_headlines};
