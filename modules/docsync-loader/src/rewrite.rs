//! Relative-link rewriting for fetched Markdown.
//!
//! Documents link to each other with repository-relative targets
//! (`./intro.md`, `../guide/setup.md#install`). Once served, they live
//! under a site-absolute route prefix, so those targets must be rebuilt as
//! `{prefix}/intro.md` etc. Absolute URLs, anchors, and already-rewritten
//! targets pass through untouched, which makes the transform idempotent on
//! its own output.

use regex::Regex;

/// Rewrite relative link targets in `input` to site-absolute routes under
/// `route_prefix`.
///
/// Covers inline links `[text](target)` (and therefore image links, which
/// share the bracket construct) plus reference-style definition lines
/// `[label]: target`. Link text and labels are preserved exactly.
pub fn rewrite_links(input: &str, route_prefix: &str) -> String {
    let inline = Regex::new(r"\[([^\]]*)\]\(([^()\s]+)\)").expect("valid regex");
    let rewritten = inline.replace_all(input, |caps: &regex::Captures| {
        match rewrite_target(&caps[2], route_prefix) {
            Some(target) => format!("[{}]({})", &caps[1], target),
            None => caps[0].to_string(),
        }
    });

    let definition = Regex::new(r"(?m)^([ \t]*\[[^\]]+\]:[ \t]*)(\S+)").expect("valid regex");
    definition
        .replace_all(&rewritten, |caps: &regex::Captures| {
            match rewrite_target(&caps[2], route_prefix) {
                Some(target) => format!("{}{}", &caps[1], target),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Rebuild one relative target, or `None` if it is not relative.
///
/// Strips every leading `./` and `../` segment — traversal depth collapses
/// to the route prefix root — and re-attaches a `#fragment` when present.
fn rewrite_target(target: &str, route_prefix: &str) -> Option<String> {
    if !target.starts_with("./") && !target.starts_with("../") {
        return None;
    }

    let (path, fragment) = match target.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (target, None),
    };

    let mut cleaned = path;
    loop {
        if let Some(rest) = cleaned.strip_prefix("./") {
            cleaned = rest;
        } else if let Some(rest) = cleaned.strip_prefix("../") {
            cleaned = rest;
        } else {
            break;
        }
    }

    let prefix = route_prefix.trim_end_matches('/');
    Some(match fragment {
        Some(fragment) => format!("{}/{}#{}", prefix, cleaned, fragment),
        None => format!("{}/{}", prefix, cleaned),
    })
}
