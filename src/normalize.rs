//! Query text preparation: lowercasing, stripping, synonym expansion.
//!
//! The synonym table is static data embedded at compile time and parsed once.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").expect("strip regex"));

static SYNONYMS: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    let raw = include_str!("../data/synonyms.json");
    serde_json::from_str::<HashMap<String, Vec<String>>>(raw).expect("valid synonym table")
});

/// Lowercase and drop every character outside `[a-z\s]`.
/// Never fails; purely non-alphabetic input yields an empty string.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALPHA.replace_all(&lowered, "").into_owned()
}

/// Replace each whitespace-separated token with its synonym expansion
/// (pass-through when the token has no entry), rejoined with single spaces.
pub fn expand(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        match SYNONYMS.get(word) {
            Some(expansion) => out.extend(expansion.iter().map(String::as_str)),
            None => out.push(word),
        }
    }
    out.join(" ")
}

/// Full preparation pipeline for an incoming query.
pub fn prepare_query(text: &str) -> String {
    expand(&normalize(text))
}
