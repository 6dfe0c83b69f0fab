// Core types: fixed-size matrices, labeled vectors, dimension mode.

pub mod matrix;
pub mod vector;

use serde::{Deserialize, Serialize};

pub use matrix::{Mat2, Mat3};
pub use vector::{Vector2, Vector3};

/// Which dimension the visualizer is operating in.
///
/// The wire spelling ("2D"/"3D") is shared with the snapshot token and
/// must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl Mode {
    /// Matrix side length for this mode (2 or 3).
    pub fn size(&self) -> usize {
        match self {
            Mode::TwoD => 2,
            Mode::ThreeD => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::TwoD => "2D",
            Mode::ThreeD => "3D",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::TwoD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_wire_spelling() {
        assert_eq!(serde_json::to_string(&Mode::TwoD).unwrap(), "\"2D\"");
        assert_eq!(serde_json::to_string(&Mode::ThreeD).unwrap(), "\"3D\"");
        let m: Mode = serde_json::from_str("\"3D\"").unwrap();
        assert_eq!(m, Mode::ThreeD);
    }

    #[test]
    fn test_mode_size() {
        assert_eq!(Mode::TwoD.size(), 2);
        assert_eq!(Mode::ThreeD.size(), 3);
        assert_eq!(Mode::default(), Mode::TwoD);
    }
}
