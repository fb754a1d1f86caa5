use std::ops::Mul;

use nalgebra::{Matrix3, Unit};

use crate::error::{Error, Result};

use super::{EPSILON, FloatType, Ray, WorldMatrix, WorldPoint, WorldVector};

/// Invertible affine transform, with the inverse and the normal matrix precomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    matrix: WorldMatrix,
    inverse: WorldMatrix,
    /// Inverse transpose of the linear part, maps object space normals to world space.
    normal_matrix: Matrix3<FloatType>,
}

impl Transform {
    pub fn identity() -> Transform {
        Transform::from_parts(WorldMatrix::identity(), WorldMatrix::identity())
    }

    pub fn new(matrix: WorldMatrix) -> Result<Transform> {
        let inverse = matrix.try_inverse().ok_or(Error::NonInvertibleTransform)?;
        Ok(Transform::from_parts(matrix, inverse))
    }

    fn from_parts(matrix: WorldMatrix, inverse: WorldMatrix) -> Transform {
        let normal_matrix = inverse.fixed_view::<3, 3>(0, 0).transpose();
        Transform {
            matrix,
            inverse,
            normal_matrix,
        }
    }

    pub fn translation(x: FloatType, y: FloatType, z: FloatType) -> Transform {
        let offset = WorldVector::new(x, y, z);
        Transform::from_parts(
            WorldMatrix::new_translation(&offset),
            WorldMatrix::new_translation(&-offset),
        )
    }

    /// Fails if any of the factors is zero.
    pub fn scaling(x: FloatType, y: FloatType, z: FloatType) -> Result<Transform> {
        if x == 0.0 || y == 0.0 || z == 0.0 {
            return Err(Error::NonInvertibleTransform);
        }
        Ok(Transform::from_parts(
            WorldMatrix::new_nonuniform_scaling(&WorldVector::new(x, y, z)),
            WorldMatrix::new_nonuniform_scaling(&WorldVector::new(1.0 / x, 1.0 / y, 1.0 / z)),
        ))
    }

    pub fn uniform_scaling(s: FloatType) -> Result<Transform> {
        Transform::scaling(s, s, s)
    }

    pub fn rotation_x(radians: FloatType) -> Transform {
        Transform::rotation(WorldVector::x_axis(), radians)
    }

    pub fn rotation_y(radians: FloatType) -> Transform {
        Transform::rotation(WorldVector::y_axis(), radians)
    }

    pub fn rotation_z(radians: FloatType) -> Transform {
        Transform::rotation(WorldVector::z_axis(), radians)
    }

    fn rotation(axis: Unit<WorldVector>, radians: FloatType) -> Transform {
        Transform::from_parts(
            WorldMatrix::from_axis_angle(&axis, radians),
            WorldMatrix::from_axis_angle(&axis, -radians),
        )
    }

    /// Each coordinate moves in proportion to the other two.
    /// `xy` is the amount of x that moves in proportion to y, and so on.
    pub fn shearing(
        xy: FloatType,
        xz: FloatType,
        yx: FloatType,
        yz: FloatType,
        zx: FloatType,
        zy: FloatType,
    ) -> Result<Transform> {
        #[rustfmt::skip]
        let matrix = WorldMatrix::new(
            1.0, xy,  xz,  0.0,
            yx,  1.0, yz,  0.0,
            zx,  zy,  1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform::new(matrix)
    }

    /// World to camera transform, looking from `from` towards `to`.
    pub fn view_transform(from: WorldPoint, to: WorldPoint, up: WorldVector) -> Result<Transform> {
        let forward = Unit::try_new(to - from, EPSILON).ok_or(Error::DegenerateView)?;
        let left =
            Unit::try_new(forward.cross(&up), EPSILON).ok_or(Error::DegenerateView)?;
        let true_up = left.cross(&forward);

        #[rustfmt::skip]
        let orientation = WorldMatrix::new(
            left.x,     left.y,     left.z,     0.0,
            true_up.x,  true_up.y,  true_up.z,  0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0,        0.0,        0.0,        1.0,
        );
        let matrix = orientation * WorldMatrix::new_translation(&-from.coords);

        // Orientation is orthonormal, so its inverse is its transpose.
        let inverse = WorldMatrix::new_translation(&from.coords) * orientation.transpose();
        Ok(Transform::from_parts(matrix, inverse))
    }

    /// Composes two transforms, `self` is applied first.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform::from_parts(next.matrix * self.matrix, self.inverse * next.inverse)
    }

    pub fn matrix(&self) -> &WorldMatrix {
        &self.matrix
    }

    pub fn inverse(&self) -> &WorldMatrix {
        &self.inverse
    }

    pub fn transform_point(&self, p: &WorldPoint) -> WorldPoint {
        self.matrix.transform_point(p)
    }

    /// Maps a world space ray into the local space of whatever this transform places.
    pub fn ray_to_local(&self, ray: &Ray) -> Ray {
        ray.transform(&self.inverse)
    }

    /// Maps an object space normal to world space and normalizes it.
    pub fn normal_to_world(&self, normal: &WorldVector) -> WorldVector {
        (self.normal_matrix * normal).normalize()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

/// Matrix-style composition: `a * b` applies `b` first.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        rhs.then(&self)
    }
}
