//! Random parameter sampling for the affine augmentation.

use crate::error::{Error, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Draws random scale and rotation parameters from configured ranges.
///
/// Ranges are validated once at construction; sampling itself cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSampler {
    scales: (f64, f64),
    degrees: (f64, f64),
    isotropic: bool,
}

impl ParameterSampler {
    /// Create a sampler for the given scale and rotation ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a range is reversed or the scale
    /// range includes non-positive values.
    pub fn new(scales: (f64, f64), degrees: (f64, f64), isotropic: bool) -> Result<Self> {
        if scales.0 > scales.1 {
            return Err(Error::InvalidConfig(format!(
                "Scale range ({}, {}) has low > high",
                scales.0, scales.1
            )));
        }
        if scales.0 <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "Scale range ({}, {}) must be strictly positive",
                scales.0, scales.1
            )));
        }
        if degrees.0 > degrees.1 {
            return Err(Error::InvalidConfig(format!(
                "Rotation range ({}, {}) has low > high",
                degrees.0, degrees.1
            )));
        }
        Ok(Self {
            scales,
            degrees,
            isotropic,
        })
    }

    /// Draw one set of `(scaling, rotation_degrees)` parameters.
    ///
    /// Three independent uniform draws per parameter; under the isotropy
    /// constraint the second and third scale values are overwritten with the
    /// first draw.
    pub fn sample(&self, rng: &mut ChaCha8Rng) -> ([f64; 3], [f64; 3]) {
        let mut scaling = [0.0; 3];
        for s in &mut scaling {
            *s = rng.gen_range(self.scales.0..=self.scales.1);
        }
        if self.isotropic {
            scaling[1] = scaling[0];
            scaling[2] = scaling[0];
        }
        let mut rotation = [0.0; 3];
        for r in &mut rotation {
            *r = rng.gen_range(self.degrees.0..=self.degrees.1);
        }
        (scaling, rotation)
    }
}
