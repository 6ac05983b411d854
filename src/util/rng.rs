//! Uniform random draws over the thread-local generator.
//!
//! Terrain features (plant placement, cloud seeding) only need small
//! uniform draws, so these wrappers keep call sites short.

use rand::Rng;

/// Uniform integer in `[0, n)`.
///
/// `n` must be positive; release builds return 0 for `n == 0` instead of
/// panicking.
#[must_use]
pub fn uniform_int(n: u32) -> u32 {
    debug_assert!(n > 0, "uniform_int bound must be positive");
    if n == 0 {
        return 0;
    }
    let mut rng = rand::rng();
    rng.random_range(0..n)
}

/// Uniform float in `[0, 1)`.
#[must_use]
pub fn uniform_f64() -> f64 {
    let mut rng = rand::rng();
    rng.random::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_int_stays_in_range() {
        for _ in 0..1000 {
            assert!(uniform_int(7) < 7);
        }
    }

    #[test]
    fn uniform_int_of_one_is_zero() {
        for _ in 0..100 {
            assert_eq!(uniform_int(1), 0);
        }
    }

    #[test]
    fn uniform_f64_stays_in_unit_interval() {
        for _ in 0..1000 {
            let x = uniform_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }
}
