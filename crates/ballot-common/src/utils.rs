//! Utility functions for Ballot

use std::sync::LazyLock;

/// Uganda national identification numbers: two letters, twelve alphanumerics.
static NIN_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[A-Z]{2}[A-Z0-9]{12}$").expect("Invalid regex pattern"));

/// Validate a national identification number
///
/// # Examples
///
/// ```
/// use ballot_common::is_valid_nin;
///
/// assert!(is_valid_nin("CM90012345ABCD"));
/// assert!(!is_valid_nin("cm90012345abcd"));
/// assert!(!is_valid_nin("CM900"));
/// ```
pub fn is_valid_nin(nin: &str) -> bool {
    NIN_PATTERN.is_match(nin)
}

/// Trim an optional string, mapping blank input to `None`
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Clamp paging parameters into the accepted range
pub fn page_bounds(page_no: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
    let page_no = page_no.filter(|n| *n > 0).unwrap_or(crate::DEFAULT_PAGE_NO);
    let page_size = page_size
        .filter(|n| *n > 0)
        .unwrap_or(crate::DEFAULT_PAGE_SIZE)
        .min(crate::MAX_PAGE_SIZE);

    (page_no, page_size)
}
