//! # Label Text Normalization
//!
//! Generated tokens and label surface forms are compared after lowercasing
//! and trimming any leading/trailing characters outside the label alphabet.

use std::sync::LazyLock;

use regex::Regex;

/// The trim pattern for label text.
///
/// Matches runs of characters outside the label alphabet (ascii letters
/// plus the Nordic/German diacritics) at either end of the text.
pub const LABEL_TRIM_PATTERN: &str = r"^[^a-zæøåüöä]+|[^a-zæøåüöä]+$";

static LABEL_TRIM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LABEL_TRIM_PATTERN).expect("LABEL_TRIM_PATTERN is valid"));

/// Normalize label text for matching.
///
/// ## Arguments
/// * `text` - The raw token or surface form.
///
/// ## Returns
/// The lowercased text with out-of-alphabet characters trimmed from both ends;
/// this may be empty.
pub fn normalize_label_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    LABEL_TRIM_REGEX.replace_all(&lowered, "").into_owned()
}
