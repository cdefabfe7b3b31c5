//! Discretized exponential sampling of a target rarity.
//!
//! A band `[min, max)` is cut into rungs `0.1` apart. Each rung is weighted by
//! `exponent^(-|average - v|)`, where `v` is the value the rung yields (the
//! rung advanced by one step), so the draws peak at `average` and a larger
//! exponent sharpens the peak. Sampling happens on the ladder itself, which
//! keeps every result aligned to the display resolution.

use rand::Rng;

use crate::error::SampleError;
use crate::model::{Levels, MAX_LEVEL, MIN_LEVEL};

/// Spacing between ladder rungs, and the display resolution of rarities.
pub const STEP: f64 = 0.1;

/// Default sharpness of the distribution.
pub const DEFAULT_EXPONENT: f64 = 2.0;

/// Longest ladder we are willing to build. Clamped levels never exceed 99 rungs.
pub const MAX_RUNGS: usize = 10_000;

// Absorbs floating drift so a rung that is `max` up to rounding is not kept.
const LADDER_EPSILON: f64 = 1e-9;

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Weighted rarity ladder for a single band.
#[derive(Debug, Clone)]
pub struct RarityLadder {
    rungs: Vec<f64>,
    weights: Vec<f64>,
    total: f64,
}

impl RarityLadder {
    /// Build the ladder for `[min, max)` centered on `average`. O(n).
    ///
    /// # Errors
    /// * [`SampleError::NonFinite`] if any bound is `NaN`/∞.
    /// * [`SampleError::InvalidExponent`] unless `exponent` is finite and > 0.
    /// * [`SampleError::Empty`] if `min >= max`.
    /// * [`SampleError::LadderTooLong`] past [`MAX_RUNGS`].
    /// * [`SampleError::ZeroSum`] if the weights underflow to nothing.
    pub fn new(min: f64, max: f64, average: f64, exponent: f64) -> Result<Self, SampleError> {
        check_finite("min", min)?;
        check_finite("max", max)?;
        check_finite("average", average)?;
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(SampleError::InvalidExponent(exponent));
        }
        if min >= max {
            return Err(SampleError::Empty);
        }

        let len = ((max - min) / STEP).ceil() as usize;
        if len > MAX_RUNGS {
            return Err(SampleError::LadderTooLong { len });
        }

        let mut rungs = Vec::with_capacity(len);
        let mut weights = Vec::with_capacity(len);
        let mut total = 0.0f64;
        // Index-based rungs: repeated `x += STEP` drifts and can sneak in a
        // rung just below `max`.
        for i in 0usize.. {
            let x = min + i as f64 * STEP;
            if x >= max - LADDER_EPSILON {
                break;
            }
            let w = exponent.powf(-(average - (x + STEP)).abs());
            rungs.push(x);
            weights.push(w);
            total += w;
        }

        if rungs.is_empty() {
            return Err(SampleError::Empty);
        }
        if !total.is_finite() || total == 0.0 {
            return Err(SampleError::ZeroSum);
        }

        Ok(Self {
            rungs,
            weights,
            total,
        })
    }

    /// Draw a rung index: take a uniform value in `[0, total)` and subtract
    /// weights in ladder order until it is used up. O(n).
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut remaining = rng.random_range(0.0..self.total);
        for (i, &w) in self.weights.iter().enumerate() {
            remaining -= w;
            if remaining <= 0.0 {
                return i;
            }
        }
        // Rounding left a sliver over; the last rung takes it.
        self.weights.len() - 1
    }

    /// Draw a rarity: the chosen rung advanced one step, at one decimal.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let i = self.sample_index(rng);
        round_tenth(self.rungs[i] + STEP)
    }

    /// Rung values, lowest first.
    pub fn rungs(&self) -> &[f64] {
        &self.rungs
    }

    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    /// Relative weight of each rung.
    #[cfg(test)]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), SampleError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SampleError::NonFinite { field, value })
    }
}

/// Sample a target rarity from `[min, max)` centered on `average`.
///
/// An empty band (`min >= max`) has no ladder; it yields `average` clamped to
/// the level range and rounded to one decimal instead of failing.
pub fn sample_rarity<R: Rng + ?Sized>(
    min: f64,
    max: f64,
    average: f64,
    exponent: f64,
    rng: &mut R,
) -> Result<f64, SampleError> {
    match RarityLadder::new(min, max, average, exponent) {
        Ok(ladder) => Ok(ladder.sample(rng)),
        Err(SampleError::Empty) => Ok(round_tenth(average.clamp(MIN_LEVEL, MAX_LEVEL))),
        Err(err) => Err(err),
    }
}

/// The sampler as configured for an engine: a fixed exponent applied to
/// whatever band a roll asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaritySampler {
    exponent: f64,
}

impl RaritySampler {
    pub fn new(exponent: f64) -> Result<Self, SampleError> {
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(SampleError::InvalidExponent(exponent));
        }
        Ok(Self { exponent })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn sample<R: Rng + ?Sized>(&self, levels: Levels, rng: &mut R) -> Result<f64, SampleError> {
        sample_rarity(levels.min, levels.max, levels.ave, self.exponent, rng)
    }
}

impl Default for RaritySampler {
    fn default() -> Self {
        Self {
            exponent: DEFAULT_EXPONENT,
        }
    }
}
