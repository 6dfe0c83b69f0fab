use serde::{Deserialize, Serialize};

use matrixlab_core::{Mat2, Mat3, Mode, Vector2, Vector3};

use crate::presets;

/// Lenient numeric entry parsing for interactive editing: anything that
/// does not parse to a finite number becomes 0.0.
pub fn parse_entry(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Coordinate axis of a vector edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Determinant, trace and Frobenius norm of the active matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixStats {
    pub determinant: f64,
    pub trace: f64,
    pub frobenius_norm: f64,
}

/// The full editable state: one matrix A and one multiplicand B per mode,
/// a fixed vector set per mode, and the grid flag. Every edit replaces a
/// whole value; nothing here is shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub mode: Mode,
    pub matrix_2d: Mat2,
    pub matrix_b_2d: Mat2,
    pub vectors_2d: Vec<Vector2>,
    pub matrix_3d: Mat3,
    pub matrix_b_3d: Mat3,
    pub vectors_3d: Vec<Vector3>,
    pub show_grid: bool,
}

pub fn initial_vectors_2d() -> Vec<Vector2> {
    vec![
        Vector2::new(1.0, 0.0, "#f43f5e", "u"),
        Vector2::new(0.0, 1.0, "#10b981", "v"),
        Vector2::new(1.0, 1.0, "#6366f1", "w"),
    ]
}

pub fn initial_vectors_3d() -> Vec<Vector3> {
    vec![
        Vector3::new(1.0, 0.0, 0.0, "#f43f5e", "u"),
        Vector3::new(0.0, 1.0, 0.0, "#10b981", "v"),
        Vector3::new(0.0, 0.0, 1.0, "#6366f1", "w"),
    ]
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            mode: Mode::TwoD,
            matrix_2d: Mat2::identity(),
            matrix_b_2d: Mat2::identity(),
            vectors_2d: initial_vectors_2d(),
            matrix_3d: Mat3::identity(),
            matrix_b_3d: Mat3::identity(),
            vectors_3d: initial_vectors_3d(),
            show_grid: true,
        }
    }
}

impl Scene {
    /// Entry of the active matrix A. Out-of-range indices read as 0.0.
    pub fn entry(&self, row: usize, col: usize) -> f64 {
        match self.mode {
            Mode::TwoD => {
                if row < 2 && col < 2 {
                    self.matrix_2d.0[row][col]
                } else {
                    0.0
                }
            }
            Mode::ThreeD => {
                if row < 3 && col < 3 {
                    self.matrix_3d.0[row][col]
                } else {
                    0.0
                }
            }
        }
    }

    /// Entry of the active multiplicand B.
    pub fn b_entry(&self, row: usize, col: usize) -> f64 {
        match self.mode {
            Mode::TwoD => {
                if row < 2 && col < 2 {
                    self.matrix_b_2d.0[row][col]
                } else {
                    0.0
                }
            }
            Mode::ThreeD => {
                if row < 3 && col < 3 {
                    self.matrix_b_3d.0[row][col]
                } else {
                    0.0
                }
            }
        }
    }

    /// Set one entry of the active matrix A. Out-of-range edits are ignored.
    pub fn set_entry(&mut self, row: usize, col: usize, value: f64) {
        match self.mode {
            Mode::TwoD => {
                if row < 2 && col < 2 {
                    self.matrix_2d.0[row][col] = value;
                }
            }
            Mode::ThreeD => {
                if row < 3 && col < 3 {
                    self.matrix_3d.0[row][col] = value;
                }
            }
        }
    }

    /// Set one entry of the active multiplicand B.
    pub fn set_b_entry(&mut self, row: usize, col: usize, value: f64) {
        match self.mode {
            Mode::TwoD => {
                if row < 2 && col < 2 {
                    self.matrix_b_2d.0[row][col] = value;
                }
            }
            Mode::ThreeD => {
                if row < 3 && col < 3 {
                    self.matrix_b_3d.0[row][col] = value;
                }
            }
        }
    }

    /// Set one coordinate of the active vector list. A Z edit in 2D mode
    /// is ignored.
    pub fn set_vector_coord(&mut self, index: usize, axis: Axis, value: f64) {
        match self.mode {
            Mode::TwoD => {
                if let Some(v) = self.vectors_2d.get_mut(index) {
                    match axis {
                        Axis::X => v.x = value,
                        Axis::Y => v.y = value,
                        Axis::Z => {}
                    }
                }
            }
            Mode::ThreeD => {
                if let Some(v) = self.vectors_3d.get_mut(index) {
                    match axis {
                        Axis::X => v.x = value,
                        Axis::Y => v.y = value,
                        Axis::Z => v.z = value,
                    }
                }
            }
        }
    }

    /// A ← Aᵀ for the active mode.
    pub fn transpose_active(&mut self) {
        match self.mode {
            Mode::TwoD => self.matrix_2d = self.matrix_2d.transpose(),
            Mode::ThreeD => self.matrix_3d = self.matrix_3d.transpose(),
        }
    }

    /// A ← A × B for the active mode.
    pub fn multiply_active(&mut self) {
        match self.mode {
            Mode::TwoD => self.matrix_2d = self.matrix_2d.multiply(&self.matrix_b_2d),
            Mode::ThreeD => self.matrix_3d = self.matrix_3d.multiply(&self.matrix_b_3d),
        }
    }

    /// Stats of the active matrix A.
    pub fn stats(&self) -> MatrixStats {
        match self.mode {
            Mode::TwoD => MatrixStats {
                determinant: self.matrix_2d.determinant(),
                trace: self.matrix_2d.trace(),
                frobenius_norm: self.matrix_2d.frobenius_norm(),
            },
            Mode::ThreeD => MatrixStats {
                determinant: self.matrix_3d.determinant(),
                trace: self.matrix_3d.trace(),
                frobenius_norm: self.matrix_3d.frobenius_norm(),
            },
        }
    }

    /// Load a named preset into the active matrix A. Returns false when
    /// the name is unknown for the active mode.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        match self.mode {
            Mode::TwoD => {
                if let Some(m) = presets::find_2d(name) {
                    self.matrix_2d = m;
                    return true;
                }
            }
            Mode::ThreeD => {
                if let Some(m) = presets::find_3d(name) {
                    self.matrix_3d = m;
                    return true;
                }
            }
        }
        false
    }

    /// Active matrix A back to identity.
    pub fn reset_matrix(&mut self) {
        match self.mode {
            Mode::TwoD => self.matrix_2d = Mat2::identity(),
            Mode::ThreeD => self.matrix_3d = Mat3::identity(),
        }
    }

    /// One vector of the active list back to its initial value.
    pub fn reset_vector(&mut self, index: usize) {
        match self.mode {
            Mode::TwoD => {
                if let Some(init) = initial_vectors_2d().into_iter().nth(index) {
                    if let Some(v) = self.vectors_2d.get_mut(index) {
                        *v = init;
                    }
                }
            }
            Mode::ThreeD => {
                if let Some(init) = initial_vectors_3d().into_iter().nth(index) {
                    if let Some(v) = self.vectors_3d.get_mut(index) {
                        *v = init;
                    }
                }
            }
        }
    }

    /// Matrices and vectors of both modes back to their initial values.
    /// The grid flag is left alone.
    pub fn reset_all(&mut self) {
        self.matrix_2d = Mat2::identity();
        self.matrix_b_2d = Mat2::identity();
        self.vectors_2d = initial_vectors_2d();
        self.matrix_3d = Mat3::identity();
        self.matrix_b_3d = Mat3::identity();
        self.vectors_3d = initial_vectors_3d();
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    /// Number of vectors in the active list.
    pub fn vector_count(&self) -> usize {
        match self.mode {
            Mode::TwoD => self.vectors_2d.len(),
            Mode::ThreeD => self.vectors_3d.len(),
        }
    }
}
