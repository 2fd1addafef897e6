// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Merging queue snapshots into one display order.

use crate::types::DownloadItem;

/// Concatenate `primary` then `secondary`, keeping each input's order.
///
/// No sorting and no identifier reconciliation: the daemon keeps an item in at
/// most one queue, and if it ever does not, both copies are shown.
pub fn merge(primary: Vec<DownloadItem>, secondary: Option<Vec<DownloadItem>>) -> Vec<DownloadItem> {
    let mut merged = primary;
    if let Some(secondary) = secondary {
        merged.extend(secondary);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<DownloadItem> {
        ids.iter().map(|id| DownloadItem::new(*id, "active")).collect()
    }

    fn ids(items: &[DownloadItem]) -> Vec<&str> {
        items.iter().map(|i| i.identifier.as_str()).collect()
    }

    #[test]
    fn test_primary_then_secondary() {
        let merged = merge(items(&["a2", "a1"]), Some(items(&["w9", "w3"])));
        assert_eq!(ids(&merged), vec!["a2", "a1", "w9", "w3"]);
    }

    #[test]
    fn test_prefix_and_suffix_preserved() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec![], vec![]),
            (vec!["a"], vec![]),
            (vec![], vec!["b"]),
            (vec!["a", "b", "c"], vec!["d", "e"]),
        ];
        for (a, b) in cases {
            let merged = merge(items(&a), Some(items(&b)));
            assert_eq!(&ids(&merged)[..a.len()], a.as_slice());
            assert_eq!(&ids(&merged)[a.len()..], b.as_slice());
        }
    }

    #[test]
    fn test_absent_secondary() {
        let merged = merge(items(&["a"]), None);
        assert_eq!(ids(&merged), vec!["a"]);
        assert!(merge(Vec::new(), None).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let merged = merge(items(&["x"]), Some(items(&["x"])));
        assert_eq!(merged.len(), 2);
    }
}
