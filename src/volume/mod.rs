//! Volume and subject containers.
//!
//! A [`Volume`] couples intensity data with an affine index-to-physical
//! mapping; a [`Subject`] groups named, spatially paired volumes together
//! with metadata recorded by the transforms applied to them.

pub(crate) mod image;
pub(crate) mod subject;

pub use image::Volume;
pub use subject::{Subject, SubjectVolume, VolumeRole};
