//! Absolute-to-relative path rewriting for text assets.
//!
//! Bundle files are authored against a server root (`'/js/app.js'`)
//! but are served from a local directory after install, so absolute
//! references must lose their leading slash.

use regex::Regex;

/// File extensions treated as rewritable text sources.
const TEXT_EXTENSIONS: [&str; 2] = [".js", ".css"];

/// Directory segments that mark a path as rewritable.
const TEXT_SEGMENTS: [&str; 2] = ["/js/", "/css/"];

/// Rewrites quoted or parenthesized absolute references (`'/js/…'`,
/// `"/js/…"`, `(/js/…)`) into relative ones, one configured prefix at
/// a time.
pub struct PathRewriter {
    rules: Vec<(Regex, String)>,
}

impl PathRewriter {
    /// Compile one rule per prefix, preserving order. Regex
    /// metacharacters in a prefix are escaped so they only ever match
    /// literally.
    pub fn new(prefixes: &[String]) -> Self {
        let rules = prefixes
            .iter()
            .map(|prefix| {
                let pattern = format!(r#"(['"(])/{}/"#, regex::escape(prefix));
                // The prefix is escaped, so the pattern is always valid.
                let re = Regex::new(&pattern).expect("escaped prefix pattern");
                (re, format!("${{1}}{}/", prefix))
            })
            .collect();
        Self { rules }
    }

    /// Apply every rule in configured order. Later prefixes operate on
    /// the already-rewritten text, so overlap order is exactly as
    /// configured.
    pub fn rewrite(&self, input: &str) -> String {
        let mut out = input.to_string();
        for (re, replacement) in &self.rules {
            out = re.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }
}

/// Only textual sources are rewritten; everything else passes through
/// as raw bytes.
pub fn is_rewritable(source: &str) -> bool {
    TEXT_EXTENSIONS.iter().any(|ext| source.ends_with(ext))
        || TEXT_SEGMENTS.iter().any(|seg| source.contains(seg))
}
