/// Rigid coordinate frames and the matrix builders used to move them
use std::fmt;

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// A principal axis of a coordinate frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn vector(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// Which axes an operation is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Space {
    /// The frame's own axes (right-multiplied)
    #[default]
    Local,
    /// The parent frame's axes (left-multiplied)
    Parent,
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Space::Local => "local",
            Space::Parent => "parent",
        })
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about a principal axis, in degrees
    pub fn rotation(axis: Axis, degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(axis.vector() * degrees.to_radians())
    }

    /// Translation along a principal axis
    pub fn axis_translation(axis: Axis, delta: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&(axis.vector() * delta))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }
}

/// Pose of one scene node relative to its parent.
///
/// The matrix is always rigid: an orthonormal, right-handed rotation block
/// plus a translation column. Every mutation re-orthonormalises the
/// rotation block so repeated small rotations cannot drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    matrix: Matrix4<f32>,
}

impl Frame {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: Transform::translation_matrix(x, y, z),
        }
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// Origin of the frame in parent coordinates
    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Upper-left 3x3 block
    pub fn rotation(&self) -> Matrix3<f32> {
        Matrix3::from_fn(|r, c| self.matrix[(r, c)])
    }

    pub fn translate(&mut self, axis: Axis, delta: f32, space: Space) {
        self.apply(&Transform::axis_translation(axis, delta), space);
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f32, space: Space) {
        self.apply(&Transform::rotation(axis, degrees), space);
    }

    /// Compose `m` on the left: `self = m * self`
    pub fn pre_multiply(&mut self, m: &Matrix4<f32>) {
        self.apply(m, Space::Parent);
    }

    fn apply(&mut self, m: &Matrix4<f32>, space: Space) {
        self.matrix = match space {
            Space::Local => self.matrix * m,
            Space::Parent => m * self.matrix,
        };
        self.orthonormalize();
    }

    /// Gram-Schmidt on the rotation columns; the bottom row is reset to [0 0 0 1].
    fn orthonormalize(&mut self) {
        let column = |c: usize| Vector3::new(self.matrix[(0, c)], self.matrix[(1, c)], self.matrix[(2, c)]);
        let x = column(0).normalize();
        let y = (column(1) - x * x.dot(&column(1))).normalize();
        let z = x.cross(&y);

        for (c, axis) in [x, y, z].iter().enumerate() {
            for r in 0..3 {
                self.matrix[(r, c)] = axis[r];
            }
            self.matrix[(3, c)] = 0.0;
        }
        self.matrix[(3, 3)] = 1.0;
    }

    /// True when the rotation block is orthonormal and right-handed within `tolerance`.
    pub fn is_rigid(&self, tolerance: f32) -> bool {
        let r = self.rotation();
        let orthonormal = (r.transpose() * r - Matrix3::identity()).norm() < tolerance;
        let right_handed = (r.determinant() - 1.0).abs() < tolerance;
        let affine = self.matrix[(3, 0)] == 0.0
            && self.matrix[(3, 1)] == 0.0
            && self.matrix[(3, 2)] == 0.0
            && self.matrix[(3, 3)] == 1.0;
        orthonormal && right_handed && affine
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}
