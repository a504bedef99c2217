//! Deterministic 2D noise sampling

use noise::{NoiseFn, Simplex};

use super::generator::GenerationSettings;

/// A continuous scalar function over the plane.
///
/// Implementations must be pure: the same coordinates always produce the
/// same value.
pub trait NoiseSampler {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Fractal Brownian motion over a seeded simplex base.
///
/// Octave `i` contributes `amplitude * persistence^i` of the base noise sampled
/// at `frequency * lacunarity^i`. Build it from settings that pass
/// [`GenerationSettings::validate`]: the simplex base panics once a scaled
/// coordinate leaves the `isize` range.
pub struct FractalNoise {
    base: Simplex,
    octaves: u32,
    amplitude: f64,
    frequency: f64,
    persistence: f64,
    lacunarity: f64,
}

impl FractalNoise {
    pub fn new(settings: &GenerationSettings) -> Self {
        Self {
            base: Simplex::new(settings.seed),
            octaves: settings.octaves,
            amplitude: settings.amplitude,
            frequency: settings.frequency,
            persistence: settings.persistence,
            lacunarity: settings.lacunarity,
        }
    }

    /// Upper bound on `|sample(x, y)|`, assuming the base stays in [-1, 1]
    pub fn bound(&self) -> f64 {
        (0..self.octaves)
            .map(|i| (self.amplitude * self.persistence.powi(i as i32)).abs())
            .sum()
    }
}

impl NoiseSampler for FractalNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let mut sum = 0.0;
        let mut amplitude = self.amplitude;
        let mut frequency = self.frequency;
        for _ in 0..self.octaves {
            sum += amplitude * self.base.get([x * frequency, y * frequency]);
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }
        sum
    }
}

impl<F> NoiseSampler for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}
