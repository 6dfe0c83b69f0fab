// Labeled display vectors. Coordinates plus the color/label the canvas
// renders them with; the wire shape is shared with the snapshot token.

use serde::{Deserialize, Serialize};

use crate::matrix::{Mat2, Mat3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
    /// Display color as `#rrggbb`.
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Display color as `#rrggbb`.
    pub color: String,
    pub label: String,
}

impl Vector2 {
    pub fn new(x: f64, y: f64, color: &str, label: &str) -> Self {
        Vector2 {
            x,
            y,
            color: color.to_string(),
            label: label.to_string(),
        }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// The image of this vector under `m`, keeping color and label.
    pub fn transformed(&self, m: &Mat2) -> Vector2 {
        let (x, y) = m.apply(self.x, self.y);
        Vector2 {
            x,
            y,
            color: self.color.clone(),
            label: self.label.clone(),
        }
    }
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64, color: &str, label: &str) -> Self {
        Vector3 {
            x,
            y,
            z,
            color: color.to_string(),
            label: label.to_string(),
        }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// The image of this vector under `m`, keeping color and label.
    pub fn transformed(&self, m: &Mat3) -> Vector3 {
        let (x, y, z) = m.apply(self.x, self.y, self.z);
        Vector3 {
            x,
            y,
            z,
            color: self.color.clone(),
            label: self.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_norm() {
        let v = Vector2::new(3.0, 4.0, "#f43f5e", "u");
        assert_eq!(v.norm(), 5.0);
        let w = Vector3::new(1.0, 2.0, 2.0, "#10b981", "v");
        assert_eq!(w.norm(), 3.0);
        assert!((Vector2::new(1.0, 1.0, "#fff", "w").norm() - 2.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_transformed_keeps_color_and_label() {
        let v = Vector2::new(1.0, 1.0, "#6366f1", "w");
        let rot90 = Mat2([[0.0, -1.0], [1.0, 0.0]]);
        let t = v.transformed(&rot90);
        assert_eq!((t.x, t.y), (-1.0, 1.0));
        assert_eq!(t.color, "#6366f1");
        assert_eq!(t.label, "w");
    }

    #[test]
    fn test_transformed_3d() {
        let v = Vector3::new(0.0, 0.0, 1.0, "#f43f5e", "u");
        let reflect_xy = Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]);
        let t = v.transformed(&reflect_xy);
        assert_eq!((t.x, t.y, t.z), (0.0, 0.0, -1.0));
    }

    #[test]
    fn test_wire_shape() {
        let v = Vector2::new(1.0, 0.0, "#f43f5e", "u");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["color"], "#f43f5e");
        assert_eq!(json["label"], "u");
    }
}
