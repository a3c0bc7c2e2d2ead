//! Volume representation: intensity data plus physical-space metadata.
//!
//! A [`Volume`] pairs a 4D `f32` array (leading singleton channel axis,
//! three spatial axes) with a 4x4 affine matrix mapping array indices to
//! physical coordinates, in the same spirit as NIfTI sform matrices.

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point3};
use ndarray::{Array3, Array4, ArrayView3, Axis};

/// A 3D intensity volume with a physical coordinate mapping.
///
/// # Coordinate systems
///
/// * **Index space**: continuous voxel indices `(i, j, k)` over the three
///   spatial axes.
/// * **Physical space**: continuous coordinates (typically mm) obtained by
///   mapping an index through the affine.
///
/// The channel axis must have size exactly 1; multi-channel data is
/// rejected rather than silently reduced.
#[derive(Debug, Clone)]
pub struct Volume {
    data: Array4<f32>,
    affine: Matrix4<f64>,
    inverse_affine: Matrix4<f64>,
}

impl Volume {
    /// Create a volume from a `[1, x, y, z]` array and a 4x4 affine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the channel axis is not 1 or
    /// the affine is singular.
    pub fn new(data: Array4<f32>, affine: [[f64; 4]; 4]) -> Result<Self> {
        let channels = data.len_of(Axis(0));
        if channels != 1 {
            return Err(Error::InvalidDimensions(format!(
                "Expected a single-channel volume, got {} channels",
                channels
            )));
        }
        let affine = Matrix4::from_fn(|r, c| affine[r][c]);
        let inverse_affine = affine.try_inverse().ok_or_else(|| {
            Error::InvalidDimensions("Affine matrix is not invertible".to_string())
        })?;
        Ok(Self {
            data,
            affine,
            inverse_affine,
        })
    }

    /// Create a volume from a bare 3D array, inserting the channel axis.
    pub fn from_spatial(data: Array3<f32>, affine: [[f64; 4]; 4]) -> Result<Self> {
        Self::new(data.insert_axis(Axis(0)), affine)
    }

    /// The full `[1, x, y, z]` data array.
    pub fn data(&self) -> &Array4<f32> {
        &self.data
    }

    /// View of the spatial `[x, y, z]` block.
    pub fn spatial(&self) -> ArrayView3<'_, f32> {
        self.data.index_axis(Axis(0), 0)
    }

    /// Spatial shape `[x, y, z]`.
    pub fn spatial_shape(&self) -> [usize; 3] {
        let s = self.data.shape();
        [s[1], s[2], s[3]]
    }

    /// The index-to-physical affine matrix.
    pub fn affine(&self) -> &Matrix4<f64> {
        &self.affine
    }

    /// Minimum intensity over the whole volume.
    pub fn min_intensity(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Map a continuous voxel index to a physical point.
    pub fn index_to_physical(&self, index: [f64; 3]) -> Point3<f64> {
        let p = Point3::new(index[0], index[1], index[2]);
        self.affine.transform_point(&p)
    }

    /// Map a physical point to a continuous voxel index.
    ///
    /// Inverse of [`Volume::index_to_physical`]; the pair is round-trip
    /// identity-preserving up to floating-point error.
    pub fn physical_to_index(&self, point: &Point3<f64>) -> [f64; 3] {
        let p = self.inverse_affine.transform_point(point);
        [p.x, p.y, p.z]
    }

    /// Physical coordinate of the geometric center of the volume.
    ///
    /// The center is the continuous index `((n_i - 1) / 2, ...)` mapped
    /// through the affine, not the physical origin.
    pub fn physical_center(&self) -> Point3<f64> {
        let [sx, sy, sz] = self.spatial_shape();
        self.index_to_physical([
            (sx as f64 - 1.0) / 2.0,
            (sy as f64 - 1.0) / 2.0,
            (sz as f64 - 1.0) / 2.0,
        ])
    }

    /// Replace the spatial data in place, keeping shape and affine.
    pub(crate) fn set_spatial(&mut self, spatial: Array3<f32>) {
        debug_assert_eq!(spatial.shape(), self.spatial().shape());
        self.data = spatial.insert_axis(Axis(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    pub const IDENTITY: [[f64; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    #[test]
    fn test_rejects_multi_channel() {
        let data = Array4::<f32>::zeros((2, 4, 4, 4));
        assert!(Volume::new(data, IDENTITY).is_err());
    }

    #[test]
    fn test_rejects_singular_affine() {
        let data = Array4::<f32>::zeros((1, 4, 4, 4));
        let singular = [[0.0; 4]; 4];
        assert!(Volume::new(data, singular).is_err());
    }

    #[test]
    fn test_index_physical_roundtrip() {
        let data = Array4::<f32>::zeros((1, 10, 10, 10));
        let affine = [
            [2.0, 0.0, 0.0, -5.0],
            [0.0, 2.0, 0.0, 3.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let vol = Volume::new(data, affine).unwrap();

        let index = [3.5, 4.5, 5.5];
        let point = vol.index_to_physical(index);
        let back = vol.physical_to_index(&point);
        for axis in 0..3 {
            assert!((back[axis] - index[axis]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_physical_center() {
        let data = Array4::<f32>::zeros((1, 9, 9, 9));
        let vol = Volume::new(data, IDENTITY).unwrap();
        let center = vol.physical_center();
        assert!((center.x - 4.0).abs() < 1e-12);
        assert!((center.y - 4.0).abs() < 1e-12);
        assert!((center.z - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_intensity() {
        let mut data = Array4::<f32>::from_elem((1, 3, 3, 3), 5.0);
        data[[0, 1, 1, 1]] = -2.0;
        let vol = Volume::new(data, IDENTITY).unwrap();
        assert_eq!(vol.min_intensity(), -2.0);
    }
}
