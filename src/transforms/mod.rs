//! Random spatial augmentation transforms.
//!
//! The central entry point is [`RandomAffine`], which samples scale and
//! rotation parameters and resamples every volume of a subject with them.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub(crate) mod border;
pub(crate) mod interpolation;
pub(crate) mod random_affine;
pub(crate) mod resample;
pub(crate) mod sampler;
pub(crate) mod spatial;

pub use border::{border_mean, border_values, otsu_threshold};
pub use interpolation::Interpolation;
pub use random_affine::{FillValue, RandomAffine, RandomAffineBuilder};
pub use sampler::ParameterSampler;
pub use spatial::AffineTransform;

/// Random number generator with optional seeding for reproducibility.
pub(crate) fn get_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
