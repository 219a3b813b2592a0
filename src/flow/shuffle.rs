use rand::seq::SliceRandom;
use rand::Rng;

/// A uniformly shuffled copy of `items` (Fisher-Yates via `SliceRandom`).
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn keeps_the_same_multiset() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = vec!["A", "B", "C", "D", "B"];
        let mut out = shuffled(&items, &mut rng);
        let mut sorted = items.clone();
        out.sort();
        sorted.sort();
        assert_eq!(out, sorted);
    }

    #[test]
    fn matches_slice_shuffle_for_the_same_seed() {
        let items = ["A", "B", "C", "D", "E", "F"];
        let mut expected = items.to_vec();
        expected.shuffle(&mut StdRng::seed_from_u64(99));
        assert_eq!(shuffled(&items, &mut StdRng::seed_from_u64(99)), expected);
    }

    #[test]
    fn short_inputs_are_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert!(shuffled(&empty, &mut rng).is_empty());
        assert_eq!(shuffled(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn all_permutations_show_up_roughly_evenly() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
        let trials = 60_000;
        for _ in 0..trials {
            *counts.entry(shuffled(&[1u8, 2, 3], &mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = trials / 6;
        for count in counts.values() {
            // 10k expected, stddev ~91
            assert!(count.abs_diff(expected) < 600, "skewed count {count}");
        }
    }
}
