use rand::Rng;

use crate::{IndexSampler, error::SampleError, ladder::RarityLadder};

/// Uniform index sampler: picks an index in `0..n` with equal probability.
#[derive(Debug, Clone, Copy)]
pub struct UniformSampler {
    n: usize,
}

impl UniformSampler {
    pub fn new(n: usize) -> Result<Self, SampleError> {
        if n == 0 {
            return Err(SampleError::Empty);
        }
        Ok(Self { n })
    }
}

impl IndexSampler for UniformSampler {
    #[inline]
    fn len(&self) -> usize {
        self.n
    }
    #[inline]
    fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.n)
    }
}

/// `RarityLadder` is the weighted sampler; wire it into the trait.
impl IndexSampler for RarityLadder {
    #[inline]
    fn len(&self) -> usize {
        // call the inherent method explicitly to avoid trait-recursion
        RarityLadder::len(self)
    }
    #[inline]
    fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        RarityLadder::sample_index(self, rng)
    }
}
