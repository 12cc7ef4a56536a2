//! Fingerprint marker embedding and extraction.
//!
//! Every published body starts with a single placeholder line that doubles
//! as a "do not edit" notice for human readers and as the carrier of the
//! content fingerprint for later builds. Embedding and extraction live in
//! the same module so the two formats cannot drift apart: a mismatch would
//! silently turn every build into an UPDATE.

use std::sync::LazyLock;

use regex::Regex;

/// Notice text shown to human readers of the published page.
const NOTICE: &str =
    "Please don't edit this page manually, the content might get overwritten.";

/// Matches the fingerprint token inside the first marker occurrence.
static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r". \[(.*?)]<").expect("marker pattern compiles"));

/// Prepend the marker line carrying `fingerprint` to a rendered body.
#[must_use]
pub fn embed(fingerprint: &str, body: &str) -> String {
    format!("<ac:placeholder>{NOTICE} [{fingerprint}]</ac:placeholder>\n{body}")
}

/// Extract the fingerprint from a previously stored body.
///
/// Returns `None` when the marker is absent or malformed, e.g. a
/// pre-existing page that was never published by confsync or one edited by
/// hand. Callers treat `None` as "assume changed" and republish; unparseable
/// remote state is never fatal.
#[must_use]
pub fn extract(stored_body: &str) -> Option<&str> {
    MARKER_RE
        .captures(stored_body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn embed_extract_round_trips() {
        let body = embed("0x1a2b3c4d", "<p>Hello</p>");
        assert_eq!(extract(&body), Some("0x1a2b3c4d"));
    }

    #[test]
    fn marker_is_the_first_line() {
        let body = embed("0xabc", "<p>Hello</p>");
        let first_line = body.lines().next().unwrap();
        assert!(first_line.starts_with("<ac:placeholder>"));
        assert!(first_line.ends_with("</ac:placeholder>"));
        assert_eq!(body.lines().nth(1), Some("<p>Hello</p>"));
    }

    #[test]
    fn missing_marker_yields_none() {
        assert_eq!(extract("<p>A page someone made by hand</p>"), None);
    }

    #[test]
    fn garbled_marker_yields_none() {
        assert_eq!(extract("<ac:placeholder>edited [0xabc</ac:placeholder>"), None);
    }

    #[test]
    fn first_match_wins() {
        let body = format!("{}\n<p>literal . [0xother]<br /></p>", embed("0xfirst", ""));
        assert_eq!(extract(&body), Some("0xfirst"));
    }

    #[test]
    fn empty_fingerprint_round_trips() {
        // A degenerate token still extracts rather than erroring.
        assert_eq!(extract(&embed("", "<p>x</p>")), Some(""));
    }
}
