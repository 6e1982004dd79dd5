//! Seeded randomness for shuffles, coin flips and random players.
//!
//! Each `GameEnvironment` owns one `GameRng`; a `RandomDecisions` source
//! owns another. Two games built from the same seeds and fed the same
//! answers shuffle and flip identically.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    /// The seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `true` with the given probability, clamped to `0.0..=1.0`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Fair coin, used to decide who goes first.
    pub fn coin_flip(&mut self) -> bool {
        self.gen_bool(0.5)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// A uniformly chosen element, `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a: Vec<u32> = (0..30).collect();
        let mut b = a.clone();
        GameRng::new(42).shuffle(&mut a);
        GameRng::new(42).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (0..20).collect();
        let original = data.clone();

        rng.shuffle(&mut data);
        assert_ne!(data, original);

        data.sort_unstable();
        assert_eq!(data, original);
    }

    #[test]
    fn test_choose() {
        let mut rng = GameRng::new(7);
        let items = ["item", "atk"];
        assert!(items.contains(rng.choose(&items).unwrap()));

        let empty: [&str; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_probability_is_clamped() {
        let mut rng = GameRng::new(1);
        assert!((0..20).all(|_| rng.gen_bool(3.0)));
        assert!((0..20).all(|_| !rng.gen_bool(-1.0)));
        assert_eq!(rng.seed(), 1);
    }

    #[test]
    fn test_coin_flip_lands_both_ways() {
        let mut rng = GameRng::new(9);
        let heads = (0..200).filter(|_| rng.coin_flip()).count();
        assert!(heads > 50 && heads < 150);
    }
}
