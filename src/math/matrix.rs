//! 3x3 homogeneous matrices for 2D affine transforms.
//!
//! Matrices are stored row-major as `[a, c, e, b, d, f, 0, 0, 1]`, so a point
//! maps as `x' = a*x + c*y + e` and `y' = b*x + d*y + f`.

use serde::{Deserialize, Serialize};

/// Tolerance used when deciding whether a matrix is singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Row-major 3x3 affine matrix with `[0, 0, 1]` as the last row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix(pub [f64; 9]);

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Builds a matrix from the six affine coefficients (canvas `transform` order).
    pub fn from_affine(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Matrix([a, c, e, b, d, f, 0.0, 0.0, 1.0])
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_affine(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_affine(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `radians` around the origin.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::from_affine(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns the six affine coefficients `(a, b, c, d, e, f)`.
    pub fn affine(&self) -> (f64, f64, f64, f64, f64, f64) {
        let m = &self.0;
        (m[0], m[3], m[1], m[4], m[2], m[5])
    }

    /// Matrix product `self * other`: `other` is applied first.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let a = &self.0;
        let b = &other.0;
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = a[row * 3] * b[col]
                    + a[row * 3 + 1] * b[3 + col]
                    + a[row * 3 + 2] * b[6 + col];
            }
        }
        Matrix(out)
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Returns the inverse, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let m = &self.0;
        let inv_det = 1.0 / det;
        Some(Matrix([
            (m[4] * m[8] - m[5] * m[7]) * inv_det,
            (m[2] * m[7] - m[1] * m[8]) * inv_det,
            (m[1] * m[5] - m[2] * m[4]) * inv_det,
            (m[5] * m[6] - m[3] * m[8]) * inv_det,
            (m[0] * m[8] - m[2] * m[6]) * inv_det,
            (m[2] * m[3] - m[0] * m[5]) * inv_det,
            (m[3] * m[7] - m[4] * m[6]) * inv_det,
            (m[1] * m[6] - m[0] * m[7]) * inv_det,
            (m[0] * m[4] - m[1] * m[3]) * inv_det,
        ]))
    }

    /// Maps a point through the matrix (homogeneous `w = 1`).
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.0;
        (m[0] * x + m[1] * y + m[2], m[3] * x + m[4] * y + m[5])
    }

    /// Maps a direction vector (homogeneous `w = 0`), ignoring translation.
    pub fn apply_vector(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.0;
        (m[0] * x + m[1] * y, m[3] * x + m[4] * y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Component-wise linear interpolation.
    pub fn lerp(&self, other: &Matrix, t: f64) -> Matrix {
        let mut out = [0.0; 9];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[i] + (other.0[i] - self.0[i]) * t;
        }
        Matrix(out)
    }

    /// Returns `self` followed by a translation in the parent frame.
    pub fn then_translate(&self, tx: f64, ty: f64) -> Matrix {
        Matrix::translation(tx, ty).multiply(self)
    }

    /// Returns `self` followed by a scale about the parent origin.
    pub fn then_scale(&self, sx: f64, sy: f64) -> Matrix {
        Matrix::scaling(sx, sy).multiply(self)
    }

    /// Returns `self` followed by a rotation about the parent origin.
    pub fn then_rotate(&self, radians: f64) -> Matrix {
        Matrix::rotation(radians).multiply(self)
    }

    /// Returns true when every component is within `epsilon` of `other`.
    pub fn approx_eq(&self, other: &Matrix, epsilon: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    pub fn to_cairo(&self) -> cairo::Matrix {
        let (a, b, c, d, e, f) = self.affine();
        cairo::Matrix::new(a, b, c, d, e, f)
    }
}

/// Composes a parent total matrix with a local matrix.
///
/// `None` stands for "never transformed" and composes as identity without
/// allocating one: two `None`s yield `None`.
pub fn compose(parent: Option<&Matrix>, local: Option<&Matrix>) -> Option<Matrix> {
    match (parent, local) {
        (Some(parent), Some(local)) => Some(parent.multiply(local)),
        (Some(only), None) | (None, Some(only)) => Some(*only),
        (None, None) => None,
    }
}

/// Maps a point through an optional matrix.
pub fn apply_optional(matrix: Option<&Matrix>, x: f64, y: f64) -> (f64, f64) {
    match matrix {
        Some(m) => m.apply(x, y),
        None => (x, y),
    }
}

/// Maps a point through the inverse of an optional matrix.
///
/// A singular matrix collapses the plane, so no point can be mapped back;
/// `None` is returned in that case.
pub fn invert_point(matrix: Option<&Matrix>, x: f64, y: f64) -> Option<(f64, f64)> {
    match matrix {
        Some(m) if !m.is_identity() => m.invert().map(|inv| inv.apply(x, y)),
        _ => Some((x, y)),
    }
}
