//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the local transform carried by every
//! entity in the tree.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Compose a translation and rotation into a matrix with unit scale.
pub fn compose(position: &Vec3, rotation: &Quat) -> Mat4 {
    Mat4::new_translation(position) * rotation.to_homogeneous()
}

/// Extract the translation column of an affine matrix.
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Local transform of an entity relative to its parent
///
/// Position and rotation are the source of truth; the matrix is recomposed
/// on every write so readers never see a stale value. Scale is always one.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTransform {
    position: Vec3,
    rotation: Quat,
    matrix: Mat4,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            matrix: Mat4::identity(),
        }
    }
}

impl LocalTransform {
    /// Create a transform from position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            matrix: compose(&position, &rotation),
        }
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Composed local matrix
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Replace the position and recompose
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recompose();
    }

    /// Replace the rotation and recompose
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.recompose();
    }

    fn recompose(&mut self) {
        self.matrix = compose(&self.position, &self.rotation);
    }
}
