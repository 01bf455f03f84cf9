//! Turning raw `href` values into absolute headline URLs.
//!
//! Plain relative paths use a naive join: one trailing `/` is dropped from the
//! base, one leading `/` from the path, and the two are glued with a single
//! `/`. The cases a naive join gets wrong are handled explicitly:
//!
//! | `href` shape | Result |
//! |---|---|
//! | empty / whitespace | rejected |
//! | `http://…`, `https://…` | unchanged |
//! | `//host/path` | base scheme prepended |
//! | `#fragment` | rejected |
//! | `mailto:`, `javascript:`, other schemes | rejected |
//! | contains `.` or `..` segments | RFC 3986 join against the base |
//! | anything else (incl. `?query`) | naive join |

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("static regex"));

/// Whether `url` starts with a scheme headlines can be served from.
pub fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve `href` against `base_url`. `None` means the link can never be a
/// headline.
pub fn resolve_url(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if is_absolute(href) {
        return Some(href.to_string());
    }
    if href.starts_with("//") {
        let scheme = base_url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .unwrap_or("https");
        return Some(format!("{scheme}:{href}"));
    }
    if SCHEME_RE.is_match(href) {
        return None;
    }
    if has_dot_segments(href) {
        if let Some(joined) = Url::parse(base_url).ok().and_then(|b| b.join(href).ok()) {
            return Some(joined.to_string());
        }
    }
    Some(naive_join(base_url, href))
}

/// `base` minus one trailing slash, `/`, `path` minus one leading slash.
pub fn naive_join(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{base}/{path}")
}

fn has_dot_segments(href: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.split('/').any(|segment| segment == "." || segment == "..")
}
