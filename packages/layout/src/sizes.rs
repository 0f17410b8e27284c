//! Size assignment for the cells of a single row.

/// Assign a width to every cell so the row sums exactly to `columns`
///
/// Explicit sizes are clamped to `1..=columns` (zero counts as missing).
/// Size-less cells share the remaining width equally, the rounding residue
/// going to the last size-less cell. When that is impossible (the row is
/// over-full, or has no size-less cells and does not add up) all widths are
/// rescaled proportionally instead.
pub fn distribute(sizes: &[Option<u32>], columns: u32) -> Vec<u32> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let columns = columns.max(1);

    let clamped: Vec<Option<u32>> = sizes
        .iter()
        .map(|size| size.filter(|&size| size > 0).map(|size| size.min(columns)))
        .collect();
    let fixed: u64 = clamped.iter().flatten().map(|&size| size as u64).sum();
    let free = clamped.iter().filter(|size| size.is_none()).count() as u64;

    if free > 0 && fixed + free <= columns as u64 {
        let remaining = columns as u64 - fixed;
        let share = (remaining / free) as u32;
        let residue = (remaining % free) as u32;
        let last_free = clamped.iter().rposition(Option::is_none);

        return clamped
            .iter()
            .enumerate()
            .map(|(index, size)| match size {
                Some(size) => *size,
                None if Some(index) == last_free => share + residue,
                None => share,
            })
            .collect();
    }

    if free == 0 && fixed == columns as u64 {
        return clamped.into_iter().flatten().collect();
    }

    let weights: Vec<u64> = clamped
        .iter()
        .map(|size| size.map_or(1, |size| size as u64))
        .collect();
    rescale(&weights, columns)
}

fn rescale(weights: &[u64], columns: u32) -> Vec<u32> {
    let total: u64 = weights.iter().sum::<u64>().max(1);
    let mut sizes: Vec<u32> = weights
        .iter()
        .map(|&weight| (weight * columns as u64 / total) as u32)
        .collect();

    let assigned: u32 = sizes.iter().sum();
    if let Some(last) = sizes.last_mut() {
        *last += columns - assigned;
    }

    // Give empty cells a column, borrowed from the widest cell
    if sizes.len() <= columns as usize {
        while let Some(empty) = sizes.iter().position(|&size| size == 0) {
            let widest = sizes
                .iter()
                .enumerate()
                .fold(0, |best, (index, &size)| if size > sizes[best] { index } else { best });
            sizes[widest] -= 1;
            sizes[empty] += 1;
        }
    }

    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_share_for_sizeless_cells() {
        assert_eq!(distribute(&[None, None, None], 12), vec![4, 4, 4]);
        assert_eq!(distribute(&[None], 12), vec![12]);
    }

    #[test]
    fn test_residue_goes_to_last_sizeless_cell() {
        assert_eq!(distribute(&[None, None, None, None, None], 12), vec![2, 2, 2, 2, 4]);
        assert_eq!(distribute(&[Some(3), None, None, Some(2)], 12), vec![3, 3, 4, 2]);
    }

    #[test]
    fn test_complete_rows_are_kept() {
        assert_eq!(distribute(&[Some(4), Some(8)], 12), vec![4, 8]);
    }

    #[test]
    fn test_underfull_rows_are_rescaled() {
        assert_eq!(distribute(&[Some(3), Some(3)], 12), vec![6, 6]);
        assert_eq!(distribute(&[Some(5), Some(5)], 12), vec![6, 6]);
    }

    #[test]
    fn test_overfull_rows_are_rescaled() {
        assert_eq!(distribute(&[Some(12), None], 12), vec![11, 1]);
        assert_eq!(distribute(&[Some(8), Some(8), Some(8)], 12), vec![4, 4, 4]);
        assert_eq!(distribute(&[Some(40), Some(1), Some(1)], 12), vec![9, 1, 2]);
    }

    #[test]
    fn test_zero_and_oversized_values_are_clamped() {
        assert_eq!(distribute(&[Some(0), Some(6)], 12), vec![6, 6]);
        assert_eq!(distribute(&[Some(99)], 12), vec![12]);
    }

    #[test]
    fn test_more_cells_than_columns() {
        let sizes = distribute(&vec![None; 14], 12);
        assert_eq!(sizes.len(), 14);
        assert_eq!(sizes.iter().sum::<u32>(), 12);
    }

    #[test]
    fn test_custom_column_count() {
        assert_eq!(distribute(&[None, None, None], 24), vec![8, 8, 8]);
        assert_eq!(distribute(&[Some(1), None], 5), vec![1, 4]);
    }
}
