use log::warn;
use regex::Regex;
use std::sync::OnceLock;

// Characters allowed in caller-supplied path fragments. '/' is permitted so
// callers may pass nested fragments; everything else is stripped.
static DISALLOWED: OnceLock<Regex> = OnceLock::new();

fn disallowed_chars() -> &'static Regex {
    DISALLOWED.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\-./]").expect("valid charset pattern"))
}

/// Strip disallowed characters from a caller-supplied path fragment.
///
/// Boundary functions that accept split names, prefixes, or file stems call
/// this explicitly before assembling paths, so the rewrite is visible in the
/// control flow. A warning is logged whenever the fragment changes.
pub fn sanitize_fragment(raw: &str) -> String {
    let cleaned = disallowed_chars().replace_all(raw, "");

    if cleaned != raw {
        warn!(
            "unsafe path fragment sanitized: '{}' -> '{}'",
            raw, cleaned
        );
    }

    cleaned.into_owned()
}

/// Sanitize a bare file stem for use as an output filename.
///
/// Tightens [`sanitize_fragment`] with the filename rules used for copied
/// dataset files (no path separators survive).
pub fn sanitize_stem(raw: &str) -> String {
    sanitize_filename::sanitize(sanitize_fragment(raw))
}
