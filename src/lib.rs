//! Random spatial augmentation for 3D medical imaging volumes.
//!
//! `voxaug` applies a randomized scale+rotation affine transform to the
//! volumes of a subject as a data-augmentation step for training pipelines.
//! Scale and rotation parameters are drawn uniformly from configurable
//! ranges, composed into a single transform anchored at the volume's
//! physical center, and applied by resampling each volume onto its own
//! grid. Out-of-bounds voxels are filled with a border-derived intensity
//! (minimum, border mean, or Otsu-filtered border mean) so the padding
//! blends with the image background. Label volumes are always resampled
//! with nearest-neighbor interpolation to avoid inventing class values.
//!
//! # Example
//!
//! ```no_run
//! use ndarray::Array3;
//! use voxaug::{RandomAffine, Subject, Volume, VolumeRole};
//!
//! let affine = [
//!     [1.0, 0.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0, 0.0],
//!     [0.0, 0.0, 1.0, 0.0],
//!     [0.0, 0.0, 0.0, 1.0],
//! ];
//! let image = Volume::from_spatial(Array3::zeros((64, 64, 64)), affine)?;
//!
//! let mut subject = Subject::new();
//! subject.insert("t1", VolumeRole::Intensity, image);
//!
//! let transform = RandomAffine::builder()
//!     .scales(0.9, 1.2)
//!     .degrees(10.0)
//!     .seed(42)
//!     .build()?;
//! transform.apply(&mut subject)?;
//! # Ok::<(), voxaug::Error>(())
//! ```

pub mod error;
pub mod transforms;
pub mod volume;

pub use error::{Error, Result};
pub use transforms::{
    AffineTransform, FillValue, Interpolation, ParameterSampler, RandomAffine,
    RandomAffineBuilder,
};
pub use volume::{Subject, SubjectVolume, Volume, VolumeRole};
