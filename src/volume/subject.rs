//! Subject container: named volumes with roles, plus recorded metadata.

use crate::error::{Error, Result};
use crate::volume::Volume;
use std::collections::BTreeMap;

/// The role of a volume within a subject.
///
/// Label volumes are always resampled with nearest-neighbor interpolation
/// so that no fractional or invented class values are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeRole {
    /// A continuous intensity image (e.g. T1-weighted MRI).
    Intensity,
    /// A discrete segmentation/label map.
    Label,
}

/// A named volume entry inside a [`Subject`].
#[derive(Debug, Clone)]
pub struct SubjectVolume {
    /// Role deciding the interpolation used during resampling.
    pub role: VolumeRole,
    /// The volume data and its physical mapping.
    pub volume: Volume,
}

/// A collection of spatially paired volumes processed as one unit.
///
/// All volumes of a subject are expected to share the same spatial shape;
/// augmentation transforms apply the same sampled parameters to each of
/// them and record those parameters into the subject's metadata.
#[derive(Debug, Clone, Default)]
pub struct Subject {
    volumes: BTreeMap<String, SubjectVolume>,
    metadata: BTreeMap<String, Vec<f64>>,
}

impl Subject {
    /// Create an empty subject.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume under the given name, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, role: VolumeRole, volume: Volume) {
        self.volumes
            .insert(name.into(), SubjectVolume { role, volume });
    }

    /// Look up a volume by name.
    pub fn volume(&self, name: &str) -> Option<&SubjectVolume> {
        self.volumes.get(name)
    }

    /// Iterate over all volumes in name order.
    pub fn volumes(&self) -> impl Iterator<Item = (&String, &SubjectVolume)> {
        self.volumes.iter()
    }

    /// Iterate mutably over all volumes in name order.
    pub fn volumes_mut(&mut self) -> impl Iterator<Item = (&String, &mut SubjectVolume)> {
        self.volumes.iter_mut()
    }

    /// Number of volumes in the subject.
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Whether the subject holds no volumes.
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Record a metadata entry (e.g. the parameters a transform applied).
    pub fn record(&mut self, key: impl Into<String>, values: Vec<f64>) {
        self.metadata.insert(key.into(), values);
    }

    /// Look up a recorded metadata entry.
    pub fn metadata(&self, key: &str) -> Option<&[f64]> {
        self.metadata.get(key).map(Vec::as_slice)
    }

    /// Verify that every volume shares the same spatial shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentShape`] naming the offending volume.
    pub fn check_consistent_shape(&self) -> Result<()> {
        let mut reference: Option<(&str, [usize; 3])> = None;
        for (name, entry) in &self.volumes {
            let shape = entry.volume.spatial_shape();
            match reference {
                None => reference = Some((name, shape)),
                Some((ref_name, ref_shape)) => {
                    if shape != ref_shape {
                        return Err(Error::InconsistentShape(format!(
                            "'{}' has shape {:?} but '{}' has shape {:?}",
                            name, shape, ref_name, ref_shape
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
