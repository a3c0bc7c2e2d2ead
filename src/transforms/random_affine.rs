//! Random affine augmentation: the orchestrating transform.

use crate::error::{Error, Result};
use crate::transforms::border::border_mean;
use crate::transforms::get_rng;
use crate::transforms::interpolation::Interpolation;
use crate::transforms::resample::resample;
use crate::transforms::sampler::ParameterSampler;
use crate::transforms::spatial::AffineTransform;
use crate::volume::{Subject, VolumeRole};
use log::debug;
use rand::Rng;
use std::str::FromStr;

/// Policy for the intensity assigned to out-of-bounds voxels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillValue {
    /// The minimum intensity of the volume being resampled.
    Minimum,
    /// The mean of the volume's six border faces.
    Mean,
    /// The mean of border values below the Otsu threshold of the border set.
    OtsuMean,
    /// A fixed constant.
    Constant(f32),
}

impl FromStr for FillValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minimum" => Ok(Self::Minimum),
            "mean" => Ok(Self::Mean),
            "otsu" => Ok(Self::OtsuMean),
            _ => s.parse::<f32>().map(Self::Constant).map_err(|_| {
                Error::InvalidConfig(format!(
                    "default_pad_value must be \"minimum\", \"mean\", \"otsu\" or a number, got \"{}\"",
                    s
                ))
            }),
        }
    }
}

/// Builder for [`RandomAffine`] with the usual defaults: scales in
/// `(0.9, 1.1)`, rotations in `(-10, 10)` degrees, anisotropic scaling,
/// Otsu-filtered border mean padding, linear interpolation, probability 1.
#[derive(Debug, Clone)]
pub struct RandomAffineBuilder {
    scales: (f64, f64),
    degrees: (f64, f64),
    isotropic: bool,
    default_pad_value: FillValue,
    interpolation: Interpolation,
    probability: f64,
    seed: Option<u64>,
}

impl Default for RandomAffineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomAffineBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            scales: (0.9, 1.1),
            degrees: (-10.0, 10.0),
            isotropic: false,
            default_pad_value: FillValue::OtsuMean,
            interpolation: Interpolation::Linear,
            probability: 1.0,
            seed: None,
        }
    }

    /// Set the scaling range `(low, high)`; each axis draws uniformly from it.
    pub fn scales(mut self, low: f64, high: f64) -> Self {
        self.scales = (low, high);
        self
    }

    /// Set a symmetric rotation bound `d`, i.e. the range `(-d, d)` degrees.
    pub fn degrees(mut self, bound: f64) -> Self {
        self.degrees = (-bound, bound);
        self
    }

    /// Set an explicit rotation range `(low, high)` in degrees.
    pub fn degrees_range(mut self, low: f64, high: f64) -> Self {
        self.degrees = (low, high);
        self
    }

    /// Force the same scale factor along all three axes.
    pub fn isotropic(mut self, isotropic: bool) -> Self {
        self.isotropic = isotropic;
        self
    }

    /// Set the fill-value policy for out-of-bounds voxels.
    pub fn default_pad_value(mut self, value: FillValue) -> Self {
        self.default_pad_value = value;
        self
    }

    /// Set the interpolation used for intensity volumes. Label volumes
    /// always use nearest-neighbor.
    pub fn image_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Probability that the transform is applied at all.
    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Set the random seed for reproducibility.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set an optional seed.
    pub fn seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration and build the transform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for reversed or non-positive ranges
    /// and probabilities outside `[0, 1]`.
    pub fn build(self) -> Result<RandomAffine> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::InvalidConfig(format!(
                "Probability must be in [0, 1], got {}",
                self.probability
            )));
        }
        let sampler = ParameterSampler::new(self.scales, self.degrees, self.isotropic)?;
        Ok(RandomAffine {
            sampler,
            default_pad_value: self.default_pad_value,
            interpolation: self.interpolation,
            probability: self.probability,
            seed: self.seed,
        })
    }
}

/// Randomized scale+rotation augmentation for the volumes of a subject.
///
/// One `apply` call samples a single set of scale and rotation parameters
/// and resamples every volume with them, so paired volumes stay spatially
/// consistent. The sampled parameters are recorded into the subject's
/// metadata under `random_scaling` and `random_rotation`.
#[derive(Debug, Clone)]
pub struct RandomAffine {
    sampler: ParameterSampler,
    default_pad_value: FillValue,
    interpolation: Interpolation,
    probability: f64,
    seed: Option<u64>,
}

impl RandomAffine {
    /// Start building a transform.
    pub fn builder() -> RandomAffineBuilder {
        RandomAffineBuilder::new()
    }

    /// Apply the transform to a subject, mutating its volumes in place.
    ///
    /// Shapes are validated before anything is sampled or mutated; a
    /// failure leaves the subject untouched. Output grids equal the input
    /// grids (shape and affine preserved).
    pub fn apply(&self, subject: &mut Subject) -> Result<()> {
        subject.check_consistent_shape()?;

        let mut rng = get_rng(self.seed);
        if self.probability < 1.0 && rng.gen::<f64>() >= self.probability {
            debug!("random affine skipped by probability gate");
            return Ok(());
        }

        let (scaling, rotation) = self.sampler.sample(&mut rng);
        debug!(
            "random affine: scaling {:?}, rotation {:?} deg",
            scaling, rotation
        );
        subject.record("random_scaling", scaling.to_vec());
        subject.record("random_rotation", rotation.to_vec());

        for (_name, entry) in subject.volumes_mut() {
            let interpolation = match entry.role {
                VolumeRole::Label => Interpolation::Nearest,
                VolumeRole::Intensity => self.interpolation,
            };
            let default = match self.default_pad_value {
                FillValue::Minimum => entry.volume.min_intensity(),
                FillValue::Mean => border_mean(&entry.volume.spatial(), false),
                FillValue::OtsuMean => border_mean(&entry.volume.spatial(), true),
                FillValue::Constant(value) => value,
            };
            let transform =
                AffineTransform::new(scaling, rotation, entry.volume.physical_center());
            let output = resample(&entry.volume, &transform, default, interpolation);
            entry.volume.set_spatial(output);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Volume;
    use ndarray::Array3;

    const IDENTITY: [[f64; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    fn subject_with(shape: (usize, usize, usize)) -> Subject {
        let data = Array3::from_shape_fn(shape, |(i, j, k)| (i + j + k) as f32);
        let mut subject = Subject::new();
        subject.insert(
            "t1",
            VolumeRole::Intensity,
            Volume::from_spatial(data, IDENTITY).unwrap(),
        );
        subject
    }

    #[test]
    fn test_parse_fill_value() {
        assert_eq!("minimum".parse::<FillValue>().unwrap(), FillValue::Minimum);
        assert_eq!("mean".parse::<FillValue>().unwrap(), FillValue::Mean);
        assert_eq!("otsu".parse::<FillValue>().unwrap(), FillValue::OtsuMean);
        assert_eq!(
            "-1.5".parse::<FillValue>().unwrap(),
            FillValue::Constant(-1.5)
        );
        assert!("median".parse::<FillValue>().is_err());
    }

    #[test]
    fn test_build_rejects_bad_probability() {
        assert!(RandomAffine::builder().probability(1.5).build().is_err());
        assert!(RandomAffine::builder().probability(-0.1).build().is_err());
    }

    #[test]
    fn test_build_rejects_bad_ranges() {
        assert!(RandomAffine::builder().scales(1.2, 0.8).build().is_err());
        assert!(RandomAffine::builder()
            .degrees_range(10.0, -10.0)
            .build()
            .is_err());
        assert!(RandomAffine::builder().scales(-1.0, 1.0).build().is_err());
    }

    #[test]
    fn test_records_sampled_parameters() {
        let transform = RandomAffine::builder().seed(3).build().unwrap();
        let mut subject = subject_with((6, 6, 6));
        transform.apply(&mut subject).unwrap();
        assert_eq!(subject.metadata("random_scaling").unwrap().len(), 3);
        assert_eq!(subject.metadata("random_rotation").unwrap().len(), 3);
    }

    #[test]
    fn test_probability_zero_is_identity() {
        let transform = RandomAffine::builder()
            .probability(0.0)
            .seed(9)
            .build()
            .unwrap();
        let mut subject = subject_with((5, 5, 5));
        let before = subject.volume("t1").unwrap().volume.data().clone();
        transform.apply(&mut subject).unwrap();
        let after = subject.volume("t1").unwrap().volume.data().clone();
        assert_eq!(before, after);
        assert!(subject.metadata("random_scaling").is_none());
    }

    #[test]
    fn test_shape_mismatch_aborts_before_mutation() {
        let mut subject = subject_with((5, 5, 5));
        subject.insert(
            "seg",
            VolumeRole::Label,
            Volume::from_spatial(Array3::zeros((4, 5, 5)), IDENTITY).unwrap(),
        );
        let before = subject.volume("t1").unwrap().volume.data().clone();

        let transform = RandomAffine::builder().seed(1).build().unwrap();
        assert!(transform.apply(&mut subject).is_err());
        let after = subject.volume("t1").unwrap().volume.data().clone();
        assert_eq!(before, after);
        assert!(subject.metadata("random_scaling").is_none());
    }

    #[test]
    fn test_deterministic_under_seed() {
        let transform = RandomAffine::builder().seed(77).build().unwrap();

        let mut a = subject_with((6, 6, 6));
        let mut b = subject_with((6, 6, 6));
        transform.apply(&mut a).unwrap();
        transform.apply(&mut b).unwrap();

        assert_eq!(
            a.metadata("random_scaling").unwrap(),
            b.metadata("random_scaling").unwrap()
        );
        assert_eq!(
            a.metadata("random_rotation").unwrap(),
            b.metadata("random_rotation").unwrap()
        );
        assert_eq!(
            a.volume("t1").unwrap().volume.data(),
            b.volume("t1").unwrap().volume.data()
        );
    }

    #[test]
    fn test_isotropic_scaling_recorded() {
        let transform = RandomAffine::builder()
            .scales(0.5, 2.0)
            .isotropic(true)
            .seed(5)
            .build()
            .unwrap();
        let mut subject = subject_with((5, 5, 5));
        transform.apply(&mut subject).unwrap();
        let scaling = subject.metadata("random_scaling").unwrap();
        assert_eq!(scaling[0], scaling[1]);
        assert_eq!(scaling[0], scaling[2]);
    }

    #[test]
    fn test_constant_fill_value() {
        // Strong shrink pushes the output corners out of bounds.
        let transform = RandomAffine::builder()
            .scales(0.2, 0.2)
            .degrees(0.0)
            .default_pad_value(FillValue::Constant(-99.0))
            .seed(2)
            .build()
            .unwrap();
        let mut subject = subject_with((9, 9, 9));
        transform.apply(&mut subject).unwrap();
        let out = subject.volume("t1").unwrap().volume.spatial().to_owned();
        assert_eq!(out[[0, 0, 0]], -99.0);
    }
}
