//! Bounded random helpers shared by emitters and particles

use flurry_core::{Rect, Span, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct ParticleRng {
    inner: StdRng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Derive an independent generator seeded from this one
    pub fn fork(&mut self) -> Self {
        Self::new(self.inner.gen())
    }

    /// Returns an integer in [min, max]
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Returns a float in [min, max), or `min` when the range is empty or
    /// not finite
    pub fn float(&mut self, min: f64, max: f64) -> f64 {
        if !(min < max && (max - min).is_finite()) {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// Returns +1.0 or -1.0 with equal probability
    pub fn sign(&mut self) -> f64 {
        if self.inner.gen_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    /// Roll a value inside `span`
    pub fn span(&mut self, span: &Span) -> f64 {
        self.float(span.min, span.max)
    }

    /// Returns a point inside `rect`
    pub fn point_in(&mut self, rect: &Rect) -> Vec2 {
        Vec2::new(
            self.float(rect.x, rect.x + rect.width),
            self.float(rect.y, rect.y + rect.height),
        )
    }
}

impl std::fmt::Debug for ParticleRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ParticleRng")
    }
}
