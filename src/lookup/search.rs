use crate::domain::{ConstraintRecord, GenericFunction};

/// Case-insensitive substring match against an identifier and description.
/// An empty query matches everything.
pub(crate) fn matches_query(query: &str, id: &str, description: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    id.to_lowercase().contains(&query) || description.to_lowercase().contains(&query)
}

/// Search a pre-fetched constraint listing by identifier or description.
///
/// Matches come back in archive order; no match yields an empty vec, not an
/// error.
pub fn find_constraint(query: &str, listing: &[ConstraintRecord]) -> Vec<ConstraintRecord> {
    listing
        .iter()
        .filter(|record| matches_query(query, &record.id, &record.description))
        .cloned()
        .collect()
}

/// Search a pre-fetched generic-function listing, same contract as
/// [`find_constraint`].
pub fn find_generic_function(query: &str, listing: &[GenericFunction]) -> Vec<GenericFunction> {
    listing
        .iter()
        .filter(|function| matches_query(query, &function.id, &function.description))
        .cloned()
        .collect()
}
