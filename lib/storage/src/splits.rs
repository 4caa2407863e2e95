use hexaplex_encoding::Permutation;

/// The largest supported number of pre-split bits.
pub const MAX_SPLIT_BITS: u8 = 16;

/// The number of pre-split bits is outside of `0..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Illegal number of split bits {0}, expected a value between 0 and {MAX_SPLIT_BITS}")]
pub struct InvalidSplitBitsError(pub u8);

/// Computes the initial split points of a new table.
///
/// Every permutation but the first starts a new region. In addition, the key space of each
/// graph-agnostic permutation is split into `2^split_bits` evenly sized regions using the two
/// bytes following the tag. The graph-scoped permutations are not pre-split as their first
/// fragment is the graph, which usually has few distinct values.
pub fn compute_split_points(split_bits: u8) -> Result<Vec<Vec<u8>>, InvalidSplitBitsError> {
    if split_bits > MAX_SPLIT_BITS {
        return Err(InvalidSplitBitsError(split_bits));
    }

    let mut split_points = Vec::new();
    for permutation in Permutation::ALL {
        if permutation != Permutation::Spo {
            split_points.push(vec![permutation.tag()]);
        }
        if split_bits > 0 && !permutation.is_graph_scoped() {
            let step = 1_u32 << (16 - u32::from(split_bits));
            for value in (step..=0xFFFF).step_by(step as usize) {
                let [_, _, high, low] = value.to_be_bytes();
                split_points.push(vec![permutation.tag(), high, low]);
            }
        }
    }
    Ok(split_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bits_splits_by_permutation_only() {
        let splits = compute_split_points(0).unwrap();
        assert_eq!(splits, vec![vec![1], vec![2], vec![3], vec![4], vec![5]]);
    }

    #[test]
    fn default_bits() {
        let splits = compute_split_points(3).unwrap();
        // 5 permutation boundaries plus 7 splits in each graph-agnostic permutation
        assert_eq!(splits.len(), 5 + 3 * 7);
        assert_eq!(splits[0], vec![0, 0x20, 0x00]);
        assert_eq!(splits[6], vec![0, 0xE0, 0x00]);
        assert_eq!(splits[7], vec![1]);
    }

    #[test]
    fn split_points_are_sorted_and_unique() {
        for bits in 0..=MAX_SPLIT_BITS {
            let splits = compute_split_points(bits).unwrap();
            assert!(splits.windows(2).all(|w| w[0] < w[1]), "bits {bits}");
        }
    }

    #[test]
    fn sixteen_bits_is_the_limit() {
        assert_eq!(compute_split_points(16).unwrap().len(), 5 + 3 * 0xFFFF);
        assert_eq!(compute_split_points(17), Err(InvalidSplitBitsError(17)));
    }
}
