//! The combined scale+rotation transform applied during resampling.

use nalgebra::{Point3, Rotation3, Vector3};

/// A scale-and-rotation transform anchored at a fixed physical center.
///
/// [`AffineTransform::map_point`] maps an *output-space* physical point into
/// *source* space, which is the direction a resampler needs: the output grid
/// is walked and each voxel asks where in the source it should sample.
///
/// The user-facing scale parameters are inverted on construction: a scale
/// of `s` means objects appear `s` times larger in the output, so the
/// output-to-source map contracts distances around the center by `1/s`.
#[derive(Debug, Clone)]
pub struct AffineTransform {
    scale: [f64; 3],
    rotation: Rotation3<f64>,
    center: Point3<f64>,
}

impl AffineTransform {
    /// Build the transform from user scaling parameters, rotation angles in
    /// degrees, and the anchoring center (normally the volume's physical
    /// center).
    ///
    /// The rotation is the Euler composition `Rz(g) * Ry(b) * Rx(a)` of the
    /// three per-axis angles.
    pub fn new(scaling: [f64; 3], degrees: [f64; 3], center: Point3<f64>) -> Self {
        let scale = [1.0 / scaling[0], 1.0 / scaling[1], 1.0 / scaling[2]];
        let [rx, ry, rz] = degrees.map(f64::to_radians);
        let rotation = Rotation3::from_euler_angles(rx, ry, rz);
        Self {
            scale,
            rotation,
            center,
        }
    }

    /// The center of rotation and scaling.
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Map an output-space physical point into source space.
    ///
    /// Rotation first, then scaling, both about the center.
    pub fn map_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let rotated: Vector3<f64> = self.rotation * (point - self.center);
        let scaled = Vector3::new(
            rotated.x * self.scale[0],
            rotated.y * self.scale[1],
            rotated.z * self.scale[2],
        );
        self.center + scaled
    }
}
