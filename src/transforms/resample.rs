//! Resampling of a volume onto its own grid under a spatial transform.

use crate::transforms::interpolation::{self, Interpolation};
use crate::transforms::spatial::AffineTransform;
use crate::volume::Volume;
use ndarray::{Array3, Zip};

/// Resample `volume` under `transform`, producing a new spatial array on
/// exactly the input's grid.
///
/// Every output voxel index is mapped to physical space through the
/// volume's affine, pushed through the transform into source space, and
/// converted back to a continuous source index for interpolation. Voxels
/// whose source coordinate falls outside the volume receive `default`
/// exactly.
pub(crate) fn resample(
    volume: &Volume,
    transform: &AffineTransform,
    default: f32,
    interpolation: Interpolation,
) -> Array3<f32> {
    let source = volume.spatial();
    let [nx, ny, nz] = volume.spatial_shape();
    let mut output = Array3::<f32>::zeros((nx, ny, nz));

    Zip::indexed(&mut output).par_for_each(|(i, j, k), out| {
        let physical = volume.index_to_physical([i as f64, j as f64, k as f64]);
        let source_point = transform.map_point(&physical);
        let source_index = volume.physical_to_index(&source_point);
        *out = interpolation::sample(&source, source_index, interpolation, default);
    });

    output
}
