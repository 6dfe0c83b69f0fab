// Fixed-size square matrices with closed-form operations.
//
// Everything here is pure arithmetic with no error paths. NaN and
// infinity propagate the way f64 propagates them.

use serde::{Deserialize, Serialize};

/// 2×2 row-major matrix. Serializes as an array of row arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat2(pub [[f64; 2]; 2]);

/// 3×3 row-major matrix. Serializes as an array of row arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat3(pub [[f64; 3]; 3]);

impl Mat2 {
    pub fn identity() -> Self {
        Mat2([[1.0, 0.0], [0.0, 1.0]])
    }

    /// Standard matrix product `self × other`.
    pub fn multiply(&self, other: &Mat2) -> Mat2 {
        let a = &self.0;
        let b = &other.0;
        let mut out = [[0.0; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                out[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
        }
        Mat2(out)
    }

    /// Swap (i,j) with (j,i).
    pub fn transpose(&self) -> Mat2 {
        let m = &self.0;
        Mat2([[m[0][0], m[1][0]], [m[0][1], m[1][1]]])
    }

    /// Closed-form `ad − bc`.
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Sum of diagonal entries.
    pub fn trace(&self) -> f64 {
        self.0[0][0] + self.0[1][1]
    }

    /// Square root of the sum of squared entries.
    pub fn frobenius_norm(&self) -> f64 {
        self.0
            .iter()
            .flatten()
            .map(|e| e * e)
            .sum::<f64>()
            .sqrt()
    }

    /// Matrix-vector product.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.0;
        (m[0][0] * x + m[0][1] * y, m[1][0] * x + m[1][1] * y)
    }
}

impl Default for Mat2 {
    fn default() -> Self {
        Mat2::identity()
    }
}

impl Mat3 {
    pub fn identity() -> Self {
        Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Standard matrix product `self × other`.
    pub fn multiply(&self, other: &Mat3) -> Mat3 {
        let a = &self.0;
        let b = &other.0;
        let mut out = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                out[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Mat3(out)
    }

    /// Swap (i,j) with (j,i).
    pub fn transpose(&self) -> Mat3 {
        let m = &self.0;
        Mat3([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Sum of diagonal entries.
    pub fn trace(&self) -> f64 {
        self.0[0][0] + self.0[1][1] + self.0[2][2]
    }

    /// Square root of the sum of squared entries.
    pub fn frobenius_norm(&self) -> f64 {
        self.0
            .iter()
            .flatten()
            .map(|e| e * e)
            .sum::<f64>()
            .sqrt()
    }

    /// Matrix-vector product.
    pub fn apply(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let m = &self.0;
        (
            m[0][0] * x + m[0][1] * y + m[0][2] * z,
            m[1][0] * x + m[1][1] * y + m[1][2] * z,
            m[2][0] * x + m[2][1] * y + m[2][2] * z,
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Mat3::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_multiply_matches_manual_formula() {
        let a = Mat2([[1.0, 2.0], [3.0, 4.0]]);
        let b = Mat2([[5.0, 6.0], [7.0, 8.0]]);
        let c = a.multiply(&b);
        // [1*5+2*7, 1*6+2*8; 3*5+4*7, 3*6+4*8]
        assert_eq!(c, Mat2([[19.0, 22.0], [43.0, 50.0]]));
    }

    #[test]
    fn test_multiply_identity_is_noop() {
        let a = Mat2([[0.5, -2.0], [3.25, 7.0]]);
        assert_eq!(a.multiply(&Mat2::identity()), a);
        assert_eq!(Mat2::identity().multiply(&a), a);

        let b = Mat3([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        assert_eq!(b.multiply(&Mat3::identity()), b);
        assert_eq!(Mat3::identity().multiply(&b), b);
    }

    #[test]
    fn test_multiply_3x3() {
        let a = Mat3([[1.0, 0.0, 2.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let b = Mat3([[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [3.0, 0.0, 1.0]]);
        let c = a.multiply(&b);
        assert_eq!(
            c,
            Mat3([[7.0, 0.0, 2.0], [0.0, 2.0, 0.0], [3.0, 0.0, 1.0]])
        );
    }

    #[test]
    fn test_transpose_involution() {
        let a = Mat2([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(a.transpose().transpose(), a);
        assert_eq!(a.transpose(), Mat2([[1.0, 3.0], [2.0, 4.0]]));

        let b = Mat3([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(b.transpose().transpose(), b);
        assert_eq!(b.transpose().0[0], [1.0, 4.0, 7.0]);
    }

    #[test]
    fn test_determinant_identity() {
        assert_eq!(Mat2::identity().determinant(), 1.0);
        assert_eq!(Mat3::identity().determinant(), 1.0);
    }

    #[test]
    fn test_determinant_singular() {
        // Second row is a multiple of the first.
        assert_eq!(Mat2([[1.0, 2.0], [2.0, 4.0]]).determinant(), 0.0);
        let m = Mat3([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 5.0]]);
        assert!(m.determinant().abs() < EPS);
    }

    #[test]
    fn test_determinant_3x3_cofactor() {
        let m = Mat3([[2.0, -1.0, 0.0], [1.0, 3.0, 4.0], [0.0, 5.0, 1.0]]);
        // 2*(3*1-4*5) - (-1)*(1*1-4*0) + 0 = -34 + 1 = -33
        assert!((m.determinant() + 33.0).abs() < EPS);
    }

    #[test]
    fn test_trace() {
        assert_eq!(Mat2([[2.0, 9.0], [9.0, 2.0]]).trace(), 4.0);
        assert_eq!(
            Mat3([[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]).trace(),
            6.0
        );
    }

    #[test]
    fn test_frobenius_norm_identity() {
        assert!((Mat2::identity().frobenius_norm() - 2.0_f64.sqrt()).abs() < EPS);
        assert!((Mat3::identity().frobenius_norm() - 3.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_uniform_scale_example() {
        // Doubling matrix: scales (1,1) to (2,2), det 4, trace 4.
        let m = Mat2([[2.0, 0.0], [0.0, 2.0]]);
        assert_eq!(m.apply(1.0, 1.0), (2.0, 2.0));
        assert_eq!(m.determinant(), 4.0);
        assert_eq!(m.trace(), 4.0);
    }

    #[test]
    fn test_apply_3x3() {
        let m = Mat3([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let (x, y, z) = m.apply(1.0, 0.0, 2.0);
        assert_eq!((x, y, z), (0.0, 1.0, 2.0));
    }

    #[test]
    fn test_serde_shape_is_row_arrays() {
        let json = serde_json::to_string(&Mat2::identity()).unwrap();
        assert_eq!(json, "[[1.0,0.0],[0.0,1.0]]");
        // Integer entries from hand-written JSON parse fine.
        let m: Mat2 = serde_json::from_str("[[0,-1],[1,0]]").unwrap();
        assert_eq!(m, Mat2([[0.0, -1.0], [1.0, 0.0]]));
    }
}
