//! Category filter applied to the fetched result set.

use shared::SearchResult;

/// Keep the records matching `category`, or all of them when none is set
///
/// Matching is exact and case-sensitive against the genre set and the type.
/// The function is pure and idempotent, so callers always reapply it to the
/// full result set instead of patching a previous output.
pub fn apply_filter(results: &[SearchResult], category: Option<&str>) -> Vec<SearchResult> {
    match category {
        None => results.to_vec(),
        Some(category) => results
            .iter()
            .filter(|result| result.matches_category(category))
            .cloned()
            .collect(),
    }
}
