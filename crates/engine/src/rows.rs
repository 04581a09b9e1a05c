//! Row lifecycle helpers.
//!
//! Deletion computes the keep-set once from the pre-deletion indices; rows are
//! never spliced one at a time, so the order of `indices` does not matter.

use std::collections::BTreeSet;

use editgrid_core::Row;

/// Deduplicate and sort `indices`, dropping any at or past `row_count`.
pub fn normalize_indices(indices: &[usize], row_count: usize) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| i < row_count)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Remove every row whose pre-deletion index is in `indices`. Returns the
/// surviving rows in their original relative order.
pub fn remove_rows(rows: Vec<Row>, indices: &[usize]) -> Vec<Row> {
    let doomed: BTreeSet<usize> = indices.iter().copied().collect();
    rows.into_iter()
        .enumerate()
        .filter(|(i, _)| !doomed.contains(i))
        .map(|(_, row)| row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use editgrid_core::CellValue;

    fn labelled(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row::new().with("label", CellValue::text(format!("r{i}"))))
            .collect()
    }

    fn labels(rows: &[Row]) -> Vec<&str> {
        rows.iter().filter_map(|r| r.value("label").as_str()).collect()
    }

    #[test]
    fn test_remove_by_keep_set() {
        let kept = remove_rows(labelled(5), &[3, 1]);
        assert_eq!(labels(&kept), vec!["r0", "r2", "r4"]);
    }

    #[test]
    fn test_normalize_drops_duplicates_and_out_of_range() {
        assert_eq!(normalize_indices(&[4, 1, 4, 9, 0], 5), vec![0, 1, 4]);
        assert!(normalize_indices(&[5, 6], 5).is_empty());
    }

    #[test]
    fn test_remove_nothing() {
        assert_eq!(remove_rows(labelled(3), &[]).len(), 3);
        assert!(remove_rows(labelled(3), &[0, 1, 2]).is_empty());
    }
}
