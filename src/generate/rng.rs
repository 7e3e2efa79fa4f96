//! Deterministic random source for the generator.

/// xorshift64* generator. Same seed, same dataset.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        // Avoid the degenerate all-zero state.
        let state = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        let mut rng = Self { state };
        // Small seeds start with mostly-zero bits; burn a few rounds.
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Uniform float in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform index in `[0, upper)`; 0 when `upper == 0`
    pub fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() % (upper as u64)) as usize
    }

    /// Uniform integer in `[lo, hi]`
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as i64
    }

    /// Uniform float in `[lo, hi]`
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        Some(&items[self.below(items.len())])
    }

    /// `k` distinct indices out of `0..n` (partial Fisher-Yates).
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        let k = k.min(n);
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = i + self.below(n - i);
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }

    /// Zipf-distributed integer `>= 1` with exponent `a > 1`.
    ///
    /// Rejection sampler from Devroye, "Non-Uniform Random Variate
    /// Generation" (1986), p. 551.
    pub fn zipf(&mut self, a: f64) -> u64 {
        let am1 = a - 1.0;
        let b = 2f64.powf(am1);
        loop {
            let u = 1.0 - self.next_f64();
            let v = self.next_f64();
            let x = u.powf(-1.0 / am1).floor();
            if !(1.0..9.0e18).contains(&x) {
                continue;
            }
            let t = (1.0 + 1.0 / x).powf(am1);
            if v * x * (t - 1.0) / (b - 1.0) <= t / b {
                return x as u64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = XorShift64::new(42);
        let mut b = XorShift64::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let mut c = XorShift64::new(43);
        assert_ne!(XorShift64::new(42).next_u64(), c.next_u64());
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_ranges_are_respected() {
        let mut rng = XorShift64::new(7);
        for _ in 0..10_000 {
            let n = rng.range_inclusive(1, 5);
            assert!((1..=5).contains(&n));
            let f = rng.uniform(5.0, 1000.0);
            assert!((5.0..=1000.0).contains(&f));
            assert!(rng.below(3) < 3);
        }
        assert_eq!(rng.range_inclusive(4, 4), 4);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn test_range_hits_both_ends() {
        let mut rng = XorShift64::new(11);
        let seen: HashSet<i64> = (0..1_000).map(|_| rng.range_inclusive(0, 3)).collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = XorShift64::new(3);
        let picked = rng.sample_indices(100, 50);
        assert_eq!(picked.len(), 50);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 50);
        assert!(picked.iter().all(|&i| i < 100));

        assert_eq!(rng.sample_indices(3, 10).len(), 3);
    }

    #[test]
    fn test_choose() {
        let mut rng = XorShift64::new(5);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&["only"]), Some(&"only"));
    }

    #[test]
    fn test_zipf_is_heavy_headed() {
        let mut rng = XorShift64::new(42);
        let draws: Vec<u64> = (0..20_000).map(|_| rng.zipf(2.0)).collect();
        assert!(draws.iter().all(|&x| x >= 1));
        let ones = draws.iter().filter(|&&x| x == 1).count();
        // P(X = 1) = 6 / pi^2 ~ 0.61 for a = 2
        assert!(ones > 11_000 && ones < 13_500, "ones = {}", ones);
    }
}
