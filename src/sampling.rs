use std::collections::HashSet;

use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Drop repeated strings, keeping the first occurrence.
pub fn dedup(pool: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(pool.len());
    pool.iter().filter(|q| seen.insert(q.as_str())).cloned().collect()
}

/// Draw up to `n` distinct questions from `pool`.
///
/// When the deduplicated pool has `n` items or fewer, all of them are returned
/// in shuffled order, so the result may be shorter than `n`. Padding is left
/// to the caller.
pub fn sample<R: Rng + ?Sized>(pool: &[String], n: usize, rng: &mut R) -> Vec<String> {
    let mut unique = dedup(pool);
    if unique.len() <= n {
        unique.shuffle(rng);
        return unique;
    }
    index::sample(rng, unique.len(), n)
        .into_iter()
        .map(|i| unique[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup(&pool(&["a", "b", "a", "c", "b"])), pool(&["a", "b", "c"]));
    }

    #[test]
    fn draws_n_distinct_members() {
        let p = pool(&["a", "b", "c", "d", "e", "f", "a"]);
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..=6 {
            let drawn = sample(&p, n, &mut rng);
            assert_eq!(drawn.len(), n);
            let distinct: HashSet<_> = drawn.iter().collect();
            assert_eq!(distinct.len(), n);
            assert!(drawn.iter().all(|q| p.contains(q)));
        }
    }

    #[test]
    fn short_pool_is_returned_whole() {
        let p = pool(&["x", "y", "x", "z"]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut drawn = sample(&p, 10, &mut rng);
        drawn.sort();
        assert_eq!(drawn, pool(&["x", "y", "z"]));
    }

    #[test]
    fn same_seed_same_draw() {
        let p: Vec<String> = (0..30).map(|i| format!("q{i}")).collect();
        let a = sample(&p, 5, &mut StdRng::seed_from_u64(99));
        let b = sample(&p, 5, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_pool() {
        assert!(sample(&[], 3, &mut StdRng::seed_from_u64(0)).is_empty());
    }
}
