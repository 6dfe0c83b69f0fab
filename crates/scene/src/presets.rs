// Named preset transformations for each mode.

use matrixlab_core::{Mat2, Mat3};

/// A named 2D transformation the user can load into matrix A.
#[derive(Debug, Clone, Copy)]
pub struct Preset2 {
    /// Stable token used on the command line.
    pub name: &'static str,
    /// Human-readable label shown in the UI.
    pub label: &'static str,
    pub matrix: Mat2,
}

/// A named 3D transformation the user can load into matrix A.
#[derive(Debug, Clone, Copy)]
pub struct Preset3 {
    pub name: &'static str,
    pub label: &'static str,
    pub matrix: Mat3,
}

pub const PRESETS_2D: &[Preset2] = &[
    Preset2 {
        name: "identity",
        label: "Identity",
        matrix: Mat2([[1.0, 0.0], [0.0, 1.0]]),
    },
    Preset2 {
        name: "rotate90",
        label: "Rotate 90°",
        matrix: Mat2([[0.0, -1.0], [1.0, 0.0]]),
    },
    Preset2 {
        name: "scale2",
        label: "Scale 2×",
        matrix: Mat2([[2.0, 0.0], [0.0, 2.0]]),
    },
    Preset2 {
        name: "shear-x",
        label: "Shear X",
        matrix: Mat2([[1.0, 1.0], [0.0, 1.0]]),
    },
    Preset2 {
        name: "reflect-x",
        label: "Reflect X",
        matrix: Mat2([[1.0, 0.0], [0.0, -1.0]]),
    },
    Preset2 {
        name: "project-x",
        label: "Project X",
        matrix: Mat2([[1.0, 0.0], [0.0, 0.0]]),
    },
];

pub const PRESETS_3D: &[Preset3] = &[
    Preset3 {
        name: "identity",
        label: "Identity",
        matrix: Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
    },
    Preset3 {
        name: "rotate-z90",
        label: "Rotate Z 90°",
        matrix: Mat3([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]),
    },
    Preset3 {
        name: "rotate-x90",
        label: "Rotate X 90°",
        matrix: Mat3([[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]]),
    },
    Preset3 {
        name: "scale2",
        label: "Scale 2×",
        matrix: Mat3([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]),
    },
    Preset3 {
        name: "reflect-xy",
        label: "Reflect XY",
        matrix: Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]),
    },
    Preset3 {
        name: "project-xy",
        label: "Project XY",
        matrix: Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]),
    },
];

/// Look up a 2D preset matrix by its command-line token.
pub fn find_2d(name: &str) -> Option<Mat2> {
    PRESETS_2D
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.matrix)
}

/// Look up a 3D preset matrix by its command-line token.
pub fn find_3d(name: &str) -> Option<Mat3> {
    PRESETS_3D
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name() {
        let r = find_2d("rotate90").unwrap();
        assert_eq!(r, Mat2([[0.0, -1.0], [1.0, 0.0]]));
        assert!(find_2d("rotate-z90").is_none());
        assert!(find_3d("rotate-z90").is_some());
        assert!(find_2d("nope").is_none());
    }

    #[test]
    fn test_rotations_preserve_area() {
        let r2 = find_2d("rotate90").unwrap();
        assert_eq!(r2.determinant(), 1.0);
        let r3 = find_3d("rotate-x90").unwrap();
        assert_eq!(r3.determinant(), 1.0);
    }

    #[test]
    fn test_projections_are_singular() {
        assert_eq!(find_2d("project-x").unwrap().determinant(), 0.0);
        assert_eq!(find_3d("project-xy").unwrap().determinant(), 0.0);
    }

    #[test]
    fn test_reflections_flip_orientation() {
        assert_eq!(find_2d("reflect-x").unwrap().determinant(), -1.0);
        assert_eq!(find_3d("reflect-xy").unwrap().determinant(), -1.0);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in PRESETS_2D.iter().enumerate() {
            for b in &PRESETS_2D[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
        for (i, a) in PRESETS_3D.iter().enumerate() {
            for b in &PRESETS_3D[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
