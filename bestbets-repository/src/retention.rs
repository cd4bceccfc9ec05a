//! Retention rule for physical indices behind an alias.
//!
//! Stale indices are pruned by age, but the newest `min_indexes_to_keep`
//! always survive regardless of how old they are, and an index the alias
//! currently points at is never selected.

use chrono::{DateTime, Duration, Utc};

use crate::types::IndexInfo;

/// Select the indices that should be deleted.
///
/// Candidates are ordered newest first. The first `min_indexes_to_keep` are
/// kept; of the remainder, those created strictly before `now - days_to_keep`
/// and not currently aliased are returned, oldest last.
pub fn select_indices_to_delete(
    indices: &[IndexInfo],
    now: DateTime<Utc>,
    days_to_keep: u32,
    min_indexes_to_keep: u32,
) -> Vec<String> {
    let cutoff = now - Duration::days(i64::from(days_to_keep));

    let mut newest_first: Vec<&IndexInfo> = indices.iter().collect();
    newest_first.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.name.cmp(&a.name))
    });

    newest_first
        .into_iter()
        .skip(min_indexes_to_keep as usize)
        .filter(|index| !index.aliased && index.created_at < cutoff)
        .map(|index| index.name.clone())
        .collect()
}
