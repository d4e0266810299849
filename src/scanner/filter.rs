use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::error::ScanError;
use crate::types::PathList;

/// A compiled include filter.
///
/// `**` spans path segments, a lone `*` stays inside one segment, every other
/// character is literal. Matching ignores case and is anchored at the end of
/// the candidate only, so `b.txt` also accepts `dir/ab.txt`.
#[derive(Debug, Clone)]
pub struct FilterMatcher {
    pattern: String,
    regex: Regex,
}

impl FilterMatcher {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Compiles a wildcard filter into its matcher.
pub fn compile_filter(pattern: &str) -> Result<FilterMatcher, ScanError> {
    let mut source = String::with_capacity(pattern.len() * 2 + 1);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                source.push_str(".*");
            } else {
                source.push_str(r"[^/\\]*");
            }
        } else {
            let mut buf = [0u8; 4];
            source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    source.push('$');

    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| ScanError::InvalidFilter { pattern: pattern.to_string(), source: e })?;
    Ok(FilterMatcher { pattern: pattern.to_string(), regex })
}

pub fn compile_filters<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<FilterMatcher>, ScanError> {
    patterns.iter().map(|p| compile_filter(p.as_ref())).collect()
}

/// Keeps the paths matching at least one filter.
///
/// Output is grouped by filter: everything the first filter accepts (in input
/// order), then whatever the second accepts that is not already present, and
/// so on. Without filters the input is returned untouched.
pub fn apply_filters(paths: PathList, filters: &[FilterMatcher]) -> PathList {
    if filters.is_empty() {
        return paths;
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(paths.len());
    let mut kept: Vec<&str> = Vec::new();
    for filter in filters {
        for path in &paths {
            if filter.is_match(path) && seen.insert(path.as_str()) {
                kept.push(path.as_str());
            }
        }
    }
    kept.into_iter().map(str::to_string).collect()
}
