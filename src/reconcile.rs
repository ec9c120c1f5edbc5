//! Keyed reconciliation of a persisted child collection against a submitted one.
//!
//! Used by job posts to sync their category rows: every row is keyed by its
//! category id, and the submitted list fully replaces the persisted one.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

/// Errors raised while computing a [`KeyedDiff`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError<K: Debug> {
    /// The submitted list names the same key more than once.
    #[error("Duplicate keys in submitted list: {keys:?}")]
    DuplicateKey { keys: Vec<K> },

    /// A key classified as shared had no persisted row to pair with.
    #[error("Key {key:?} is missing from the persisted set")]
    NotFoundInSet { key: K },
}

/// Disjoint change sets produced by [`diff_by_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedDiff<P, S> {
    /// Persisted rows whose key is absent from the submission, in persisted order.
    pub to_delete: Vec<P>,
    /// Persisted rows paired with the submitted spec that overwrites them, in submitted order.
    pub to_update: Vec<(P, S)>,
    /// Submitted specs with no persisted counterpart, in submitted order.
    pub to_insert: Vec<S>,
}

impl<P, S> KeyedDiff<P, S> {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_update.is_empty() && self.to_insert.is_empty()
    }
}

/// Splits `persisted` and `submitted` into delete/update/insert sets by key.
///
/// Submitted keys must be unique; all duplicates are reported together
/// before anything else is computed. Should `persisted` carry the same key
/// twice, the first row is kept and the surplus lands in `to_delete`.
pub fn diff_by_key<P, S, K, FP, FS>(
    persisted: Vec<P>,
    submitted: Vec<S>,
    key_of_persisted: FP,
    key_of_submitted: FS,
) -> Result<KeyedDiff<P, S>, DiffError<K>>
where
    K: Eq + Hash + Clone + Debug,
    FP: Fn(&P) -> K,
    FS: Fn(&S) -> K,
{
    let mut submitted_keys = HashSet::with_capacity(submitted.len());
    let mut duplicates = Vec::new();
    for spec in &submitted {
        let key = key_of_submitted(spec);
        if !submitted_keys.insert(key.clone()) && !duplicates.contains(&key) {
            duplicates.push(key);
        }
    }
    if !duplicates.is_empty() {
        return Err(DiffError::DuplicateKey { keys: duplicates });
    }

    let mut to_delete = Vec::new();
    let mut retained: HashMap<K, P> = HashMap::new();
    for row in persisted {
        let key = key_of_persisted(&row);
        if submitted_keys.contains(&key) && !retained.contains_key(&key) {
            retained.insert(key, row);
        } else {
            to_delete.push(row);
        }
    }

    let shared: HashSet<K> = retained.keys().cloned().collect();
    let mut to_update = Vec::with_capacity(shared.len());
    let mut to_insert = Vec::new();
    for spec in submitted {
        let key = key_of_submitted(&spec);
        if shared.contains(&key) {
            let row = retained
                .remove(&key)
                .ok_or(DiffError::NotFoundInSet { key })?;
            to_update.push((row, spec));
        } else {
            to_insert.push(spec);
        }
    }

    Ok(KeyedDiff {
        to_delete,
        to_update,
        to_insert,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: u32,
        key: char,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Spec {
        key: char,
        required: i32,
    }

    fn rows(keys: &str) -> Vec<Row> {
        keys.chars()
            .enumerate()
            .map(|(i, key)| Row { id: i as u32, key })
            .collect()
    }

    fn specs(keys: &str) -> Vec<Spec> {
        keys.chars()
            .enumerate()
            .map(|(i, key)| Spec {
                key,
                required: i as i32,
            })
            .collect()
    }

    fn diff(persisted: &str, submitted: &str) -> Result<KeyedDiff<Row, Spec>, DiffError<char>> {
        diff_by_key(rows(persisted), specs(submitted), |r| r.key, |s| s.key)
    }

    #[test]
    fn test_overlapping_sets() {
        let result = diff("ABC", "BCD").unwrap();

        let deleted: Vec<char> = result.to_delete.iter().map(|r| r.key).collect();
        let updated: Vec<char> = result.to_update.iter().map(|(r, _)| r.key).collect();
        let inserted: Vec<char> = result.to_insert.iter().map(|s| s.key).collect();

        assert_eq!(deleted, vec!['A']);
        assert_eq!(updated, vec!['B', 'C']);
        assert_eq!(inserted, vec!['D']);
    }

    #[test]
    fn test_update_pairs_matching_rows() {
        let result = diff("ABC", "CB").unwrap();
        let pairs: Vec<(u32, i32)> = result
            .to_update
            .iter()
            .map(|(row, spec)| (row.id, spec.required))
            .collect();
        // Submitted order: C first, then B.
        assert_eq!(pairs, vec![(2, 0), (1, 1)]);
    }

    #[test]
    fn test_duplicate_submitted_key() {
        let err = diff("A", "BCB").unwrap_err();
        assert_eq!(err, DiffError::DuplicateKey { keys: vec!['B'] });
    }

    #[test]
    fn test_all_duplicates_reported_once() {
        let err = diff("", "AABBBC").unwrap_err();
        assert_eq!(err, DiffError::DuplicateKey { keys: vec!['A', 'B'] });
    }

    #[test]
    fn test_empty_submission_deletes_everything() {
        let result = diff("AB", "").unwrap();
        assert_eq!(result.to_delete.len(), 2);
        assert!(result.to_update.is_empty());
        assert!(result.to_insert.is_empty());
    }

    #[test]
    fn test_empty_persisted_inserts_everything() {
        let result = diff("", "XY").unwrap();
        assert!(result.to_delete.is_empty());
        assert_eq!(result.to_insert.len(), 2);
    }

    #[test]
    fn test_both_empty() {
        assert!(diff("", "").unwrap().is_empty());
    }

    #[test]
    fn test_persisted_duplicates_keep_first() {
        let result = diff("AA", "A").unwrap();
        assert_eq!(result.to_update.len(), 1);
        assert_eq!(result.to_update[0].0.id, 0);
        assert_eq!(result.to_delete, vec![Row { id: 1, key: 'A' }]);
    }

    #[test]
    fn test_error_display() {
        let err = DiffError::DuplicateKey { keys: vec!["b"] };
        assert_eq!(err.to_string(), "Duplicate keys in submitted list: [\"b\"]");
    }

    proptest! {
        #[test]
        fn prop_sets_partition_keys(
            persisted in proptest::collection::hash_set(0u8..32, 0..16),
            submitted in proptest::collection::hash_set(0u8..32, 0..16),
        ) {
            let persisted: Vec<u8> = persisted.into_iter().collect();
            let submitted: Vec<u8> = submitted.into_iter().collect();
            let result = diff_by_key(persisted.clone(), submitted.clone(), |p| *p, |s| *s).unwrap();

            for row in &result.to_delete {
                prop_assert!(!submitted.contains(row));
            }
            for (row, spec) in &result.to_update {
                prop_assert_eq!(row, spec);
            }
            for spec in &result.to_insert {
                prop_assert!(!persisted.contains(spec));
            }
            prop_assert_eq!(result.to_delete.len() + result.to_update.len(), persisted.len());
            prop_assert_eq!(result.to_update.len() + result.to_insert.len(), submitted.len());
        }
    }
}
