use num_traits::Float;
use std::cmp::Ordering;

/// Sort a copy of `values` in ascending order; NaNs compare equal.
pub fn sorted_copy<T: Float>(values: &[T]) -> Vec<T> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean<T: Float>(values: &[T]) -> T {
    let n = T::from(values.len()).unwrap_or_else(T::nan);
    values.iter().fold(T::zero(), |acc, &v| acc + v) / n
}

/// Bessel-corrected sample variance; NaN when fewer than two values.
pub fn sample_variance<T: Float>(values: &[T]) -> T {
    if values.len() < 2 {
        return T::nan();
    }
    let m = mean(values);
    let ss = values.iter().fold(T::zero(), |acc, &v| acc + (v - m) * (v - m));
    ss / T::from(values.len() - 1).unwrap_or_else(T::nan)
}

/// Average ranks (1-based) of `values`, ties sharing the mean of their
/// positions. Returned in the original order.
pub fn average_ranks<T: Float>(values: &[T]) -> Vec<T> {
    let mut indexed: Vec<(usize, T)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let two = T::one() + T::one();
    let mut ranks = vec![T::zero(); values.len()];
    let mut i = 0;
    while i < indexed.len() {
        let val = indexed[i].1;
        let mut j = i + 1;

        // Find tied values
        while j < indexed.len() && indexed[j].1 == val {
            j += 1;
        }

        // Positions i..j hold ranks i+1..=j; their average is (i + j + 1) / 2
        let rank = T::from(i + j + 1).unwrap_or_else(T::nan) / two;
        for &(original_idx, _) in &indexed[i..j] {
            ranks[original_idx] = rank;
        }

        i = j;
    }
    ranks
}

/// Sizes of every group of tied values in `values` (groups of one included).
pub fn tie_group_sizes<T: Float>(values: &[T]) -> Vec<usize> {
    let sorted = sorted_copy(values);
    let mut sizes = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        sizes.push(j - i);
        i = j;
    }
    sizes
}
