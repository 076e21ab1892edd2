//! Small deterministic RNG for spawn rolls and phrase picks.
//!
//! Counter-based SplitMix64: cheap, serializable, and reproducible under a
//! fixed seed, which keeps the mini-game spawn policy unit-testable. The seed
//! is taken from `js_sys::Date::now()` at startup (`SystemTime::now()` panics
//! on wasm32-unknown-unknown) and passed in explicitly, no ambient state.

pub struct SimpleRng {
    seed: u64,
    counter: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    /// Seed from a wall-clock millisecond timestamp.
    pub fn from_clock(now_ms: f64) -> Self {
        Self::new(now_ms as u64 | 1)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut z = self
            .seed
            .wrapping_add(self.counter.wrapping_mul(0x9E3779B97F4A7C15));
        self.counter = self.counter.wrapping_add(1);

        z = z.wrapping_add(0x9E3779B97F4A7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11; // 53 bits
        (v as f64) / ((1u64 << 53) as f64)
    }

    /// Bernoulli trial with probability `p` (clamped to `[0, 1]`).
    pub fn roll(&mut self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.0, 1.0)
    }

    /// Uniform in `[lo, hi)`.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform in `[0, n)`.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_u64() % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_under_fixed_seed() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimpleRng::new(1);
        let mut b = SimpleRng::new(2);
        let same = (0..10).filter(|_| a.next_u64() == b.next_u64()).count();
        assert!(same < 10);
    }

    #[test]
    fn unit_interval_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn roll_edge_probabilities() {
        let mut rng = SimpleRng::new(9);
        for _ in 0..100 {
            assert!(!rng.roll(0.0));
            assert!(rng.roll(1.0));
        }
    }

    #[test]
    fn range_respects_bounds() {
        let mut rng = SimpleRng::new(11);
        for _ in 0..1000 {
            let v = rng.range_f64(10.0, 90.0);
            assert!((10.0..90.0).contains(&v));
        }
    }

    #[test]
    fn roll_rate_roughly_matches_p() {
        let mut rng = SimpleRng::new(1234);
        let hits = (0..10_000).filter(|_| rng.roll(0.7)).count();
        // 70% ± 3% over 10k trials
        assert!((6_700..=7_300).contains(&hits), "hits = {hits}");
    }
}
