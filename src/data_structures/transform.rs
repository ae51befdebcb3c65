//! Local transform data for hierarchical scene composition.
//!
//! A [`Transform`] bundles position, rotation, and scale the way scene nodes
//! store them relative to their parent. Composition follows
//! translate-rotate-scale order, so a chain of transforms multiplied
//! root-to-leaf yields the absolute world matrix.

use std::ops::Mul;

use cgmath::{InnerSpace, One, SquareMatrix};

/// Per-node transformation: position, rotation (as quaternion), and scale.
///
/// A node's world transform is obtained by composing its local `Transform`
/// with every ancestor's, either through matrices ([`to_matrix`](Self::to_matrix)
/// and a matrix product) or directly in TRS form via the `Mul` operator.
#[derive(Clone, Debug)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// Create a new transform with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Extract position, rotation and scale from a composed matrix.
    ///
    /// Translation is the w column, scale the basis-column magnitudes (the x
    /// component is negated for mirroring matrices), and rotation comes from
    /// the scale-normalized upper 3x3. Shear that cannot be represented as
    /// translate-rotate-scale is discarded.
    pub fn from_matrix(m: cgmath::Matrix4<f32>) -> Self {
        let position = m.w.truncate();
        let basis = cgmath::Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate());
        let mut sx = basis.x.magnitude();
        let sy = basis.y.magnitude();
        let sz = basis.z.magnitude();
        if basis.determinant() < 0.0 {
            sx = -sx;
        }
        if sx.abs() <= f32::EPSILON || sy <= f32::EPSILON || sz <= f32::EPSILON {
            // A collapsed axis carries no recoverable orientation.
            return Self {
                position,
                rotation: cgmath::Quaternion::one(),
                scale: cgmath::Vector3::new(sx, sy, sz),
            };
        }
        let rotation: cgmath::Quaternion<f32> =
            cgmath::Matrix3::from_cols(basis.x / sx, basis.y / sy, basis.z / sz).into();
        Self {
            position,
            rotation: rotation.normalize(),
            scale: cgmath::Vector3::new(sx, sy, sz),
        }
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        &self * &rhs
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = cgmath::Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let scaled_rhs_pos = cgmath::Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        let new_position = self.position + (self.rotation * scaled_rhs_pos);

        Transform {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl From<cgmath::Vector3<f32>> for Transform {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Quaternion, Rotation3, Vector3};

    fn assert_vec3_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!(
            (a - b).magnitude() < 1e-4,
            "expected {:?} to equal {:?}",
            a,
            b
        );
    }

    #[test]
    fn identity_matrix_for_default_transform() {
        let m = Transform::new().to_matrix();
        assert_eq!(m, cgmath::Matrix4::identity());
    }

    #[test]
    fn decompose_roundtrips_nonuniform_scale() {
        let t = Transform {
            position: Vector3::new(3.0, -1.0, 4.5),
            rotation: Quaternion::from_angle_y(Deg(40.0)),
            scale: Vector3::new(2.0, 0.5, 1.25),
        };
        let back = Transform::from_matrix(t.to_matrix());
        assert_vec3_eq(back.position, t.position);
        assert_vec3_eq(back.scale, t.scale);
        // Quaternions are equal up to sign.
        let dot = back.rotation.dot(t.rotation).abs();
        assert!(dot > 1.0 - 1e-4, "rotation drifted, |dot| = {}", dot);
    }

    #[test]
    fn trs_composition_matches_matrix_product() {
        let parent = Transform {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Quaternion::from_angle_z(Deg(30.0)),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let child = Transform {
            position: Vector3::new(-1.0, 0.5, 0.0),
            rotation: Quaternion::from_angle_x(Deg(-15.0)),
            scale: Vector3::new(0.5, 0.5, 0.5),
        };
        let composed = (&parent * &child).to_matrix();
        let reference = parent.to_matrix() * child.to_matrix();
        for c in 0..4 {
            let diff = composed[c] - reference[c];
            assert!(diff.magnitude() < 1e-4, "column {} diverged: {:?}", c, diff);
        }
    }
}
