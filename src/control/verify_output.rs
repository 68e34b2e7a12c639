//! Structured view of the monitoring core's `-v` verification output
//!
//! ```text
//! Warning: Host 'web01' has no services associated with it!
//! Total Warnings: 1
//! Total Errors:   0
//! ```
//!
//! becomes
//!
//! ```json
//! {"Warning": "Host 'web01' has no services associated with it!",
//!  "Total Warnings": "1", "Total Errors": "0"}
//! ```

use indexmap::IndexMap;
use serde::Serialize;

/// Line prefixes collected from the verification output, in output order
pub const BUCKETS: [&str; 4] = ["Error", "Warning", "Total Errors", "Total Warnings"];

/// Content of one bucket after collapsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BucketValue {
    Single(String),
    Many(Vec<String>),
}

/// Non-empty buckets keyed by their prefix
pub type StructuredOutput = IndexMap<String, BucketValue>;

/// Remainder of `line` after a case-insensitive `prefix` and one separator
fn strip_bucket_prefix<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &line[prefix.len()..];
    let mut chars = rest.chars();
    chars.next();
    Some(chars.as_str().trim())
}

/// Classify verification output lines into buckets
///
/// Returns `None` when no line matched any bucket, so callers can fall back
/// to the raw text.
pub fn parse_verification_output(text: &str) -> Option<StructuredOutput> {
    let mut buckets: IndexMap<&str, Vec<String>> =
        BUCKETS.iter().map(|bucket| (*bucket, Vec::new())).collect();

    for line in text.lines() {
        for bucket in BUCKETS {
            if let Some(rest) = strip_bucket_prefix(line, bucket) {
                if let Some(values) = buckets.get_mut(bucket) {
                    values.push(rest.to_string());
                }
            }
        }
    }

    let structured: StructuredOutput = buckets
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(bucket, mut values)| {
            let value = if values.len() == 1 {
                BucketValue::Single(values.remove(0))
            } else {
                BucketValue::Many(values)
            };
            (bucket.to_string(), value)
        })
        .collect();

    if structured.is_empty() {
        None
    } else {
        Some(structured)
    }
}
