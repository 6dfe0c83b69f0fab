//! Snapshot share tokens — frozen wire format.
//!
//! A token is standard base64 (with padding) of a JSON object carrying the
//! shareable part of the scene:
//!
//! ```json
//! {"mode": "2D", "matrix2D": [[1,0],[0,1]], "vectors2D": [...],
//!  "matrix3D": [[1,0,0],[0,1,0],[0,0,1]], "vectors3D": [...]}
//! ```
//!
//! The five field names are a compatibility contract with tokens already
//! in circulation; do not rename them. Matrix B and the grid flag are
//! working state and stay out of the token.
//!
//! Decoding is deliberately forgiving about *content* (absent fields keep
//! their defaults) and strict about *shape*: anything that is not base64
//! of a JSON object of the right types is an error the caller logs and
//! ignores, keeping default state.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use matrixlab_core::{Mat2, Mat3, Mode, Vector2, Vector3};
use matrixlab_scene::Scene;

/// The decoded payload of a share token. Every field is optional so a
/// partial token merges onto defaults instead of clobbering them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(rename = "matrix2D", skip_serializing_if = "Option::is_none")]
    pub matrix_2d: Option<Mat2>,
    #[serde(rename = "vectors2D", skip_serializing_if = "Option::is_none")]
    pub vectors_2d: Option<Vec<Vector2>>,
    #[serde(rename = "matrix3D", skip_serializing_if = "Option::is_none")]
    pub matrix_3d: Option<Mat3>,
    #[serde(rename = "vectors3D", skip_serializing_if = "Option::is_none")]
    pub vectors_3d: Option<Vec<Vector3>>,
}

impl Snapshot {
    /// Capture the shareable part of a scene. All five fields are set.
    pub fn from_scene(scene: &Scene) -> Snapshot {
        Snapshot {
            mode: Some(scene.mode),
            matrix_2d: Some(scene.matrix_2d),
            vectors_2d: Some(scene.vectors_2d.clone()),
            matrix_3d: Some(scene.matrix_3d),
            vectors_3d: Some(scene.vectors_3d.clone()),
        }
    }

    /// Merge the captured fields into `scene`, leaving absent fields and
    /// non-token state (matrix B, grid flag) untouched.
    pub fn apply_to(&self, scene: &mut Scene) {
        if let Some(mode) = self.mode {
            scene.mode = mode;
        }
        if let Some(m) = self.matrix_2d {
            scene.matrix_2d = m;
        }
        if let Some(v) = &self.vectors_2d {
            scene.vectors_2d = v.clone();
        }
        if let Some(m) = self.matrix_3d {
            scene.matrix_3d = m;
        }
        if let Some(v) = &self.vectors_3d {
            scene.vectors_3d = v.clone();
        }
    }
}

#[derive(Debug)]
pub enum ShareError {
    /// The token is not valid base64.
    Base64(String),
    /// The decoded bytes are not UTF-8 text.
    Utf8,
    /// The decoded text is not a snapshot JSON object.
    Json(String),
    /// The scene could not be serialized (non-finite entries).
    Serialize(String),
}

impl std::fmt::Display for ShareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareError::Base64(e) => write!(f, "token is not valid base64: {}", e),
            ShareError::Utf8 => write!(f, "token does not decode to text"),
            ShareError::Json(e) => write!(f, "token does not hold a snapshot: {}", e),
            ShareError::Serialize(e) => write!(f, "cannot serialize snapshot: {}", e),
        }
    }
}

impl std::error::Error for ShareError {}

/// Build a share token for the scene.
pub fn encode(scene: &Scene) -> Result<String, ShareError> {
    let json = serde_json::to_string(&Snapshot::from_scene(scene))
        .map_err(|e| ShareError::Serialize(e.to_string()))?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Parse a share token. The caller decides what to do with a failure; the
/// visualizer logs it and keeps defaults.
pub fn decode(token: &str) -> Result<Snapshot, ShareError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| ShareError::Base64(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| ShareError::Utf8)?;
    serde_json::from_str(&text).map_err(|e| ShareError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrixlab_scene::initial_vectors_2d;

    #[test]
    fn test_round_trip_reproduces_scene() {
        let mut scene = Scene::default();
        scene.mode = Mode::ThreeD;
        scene.matrix_2d = Mat2([[0.5, -1.25], [3.0, 4.75]]);
        scene.vectors_2d[1].x = -2.5;
        scene.matrix_3d = Mat3([[1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [7.0, 0.0, 2.0]]);
        scene.vectors_3d[2].label = "q".to_string();

        let token = encode(&scene).unwrap();
        let snap = decode(&token).unwrap();

        let mut restored = Scene::default();
        snap.apply_to(&mut restored);
        assert_eq!(restored.mode, scene.mode);
        assert_eq!(restored.matrix_2d, scene.matrix_2d);
        assert_eq!(restored.vectors_2d, scene.vectors_2d);
        assert_eq!(restored.matrix_3d, scene.matrix_3d);
        assert_eq!(restored.vectors_3d, scene.vectors_3d);
    }

    #[test]
    fn test_token_carries_frozen_field_names() {
        let token = encode(&Scene::default()).unwrap();
        let bytes = STANDARD.decode(&token).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["matrix2D", "matrix3D", "mode", "vectors2D", "vectors3D"]
        );
    }

    #[test]
    fn test_matrix_b_and_grid_stay_out_of_the_token() {
        let mut scene = Scene::default();
        scene.matrix_b_2d = Mat2([[9.0, 9.0], [9.0, 9.0]]);
        scene.show_grid = false;
        let token = encode(&scene).unwrap();
        let snap = decode(&token).unwrap();

        let mut restored = Scene::default();
        snap.apply_to(&mut restored);
        assert_eq!(restored.matrix_b_2d, Mat2::identity());
        assert!(restored.show_grid);
    }

    #[test]
    fn test_garbage_tokens_error_cleanly() {
        assert!(matches!(decode("!!not base64!!"), Err(ShareError::Base64(_))));
        // "aGVsbG8=" is base64 of "hello": text but not JSON.
        assert!(matches!(decode("aGVsbG8="), Err(ShareError::Json(_))));
        // Valid JSON of the wrong shape.
        let wrong = STANDARD.encode(r#"{"matrix2D": "not a matrix"}"#);
        assert!(matches!(decode(&wrong), Err(ShareError::Json(_))));
        // Not UTF-8.
        let binary = STANDARD.encode([0xff, 0xfe, 0x00, 0x01]);
        assert!(matches!(decode(&binary), Err(ShareError::Utf8)));
    }

    #[test]
    fn test_failed_decode_leaves_scene_at_defaults() {
        let mut scene = Scene::default();
        // The caller pattern: merge only on success.
        if let Ok(snap) = decode("corrupted-token") {
            snap.apply_to(&mut scene);
        }
        assert_eq!(scene, Scene::default());
    }

    #[test]
    fn test_partial_token_merges_onto_defaults() {
        // base64 of {"mode":"3D"}
        let snap = decode("eyJtb2RlIjoiM0QifQ==").unwrap();
        assert_eq!(snap.mode, Some(Mode::ThreeD));
        assert!(snap.matrix_2d.is_none());

        let mut scene = Scene::default();
        snap.apply_to(&mut scene);
        assert_eq!(scene.mode, Mode::ThreeD);
        assert_eq!(scene.matrix_2d, Mat2::identity());
        assert_eq!(scene.vectors_2d, initial_vectors_2d());
    }

    #[test]
    fn test_integer_entries_from_foreign_encoders() {
        // Tokens built elsewhere write 2 rather than 2.0; both must parse.
        // base64 of {"mode":"2D","matrix2D":[[2,0],[0,2]],
        //            "vectors2D":[{"x":1,"y":1,"color":"#f43f5e","label":"u"}]}
        let token = "eyJtb2RlIjoiMkQiLCJtYXRyaXgyRCI6W1syLDBdLFswLDJdXSwidmVjdG9yczJEIjpbeyJ4IjoxLCJ5IjoxLCJjb2xvciI6IiNmNDNmNWUiLCJsYWJlbCI6InUifV19";
        let snap = decode(token).unwrap();
        assert_eq!(snap.matrix_2d, Some(Mat2([[2.0, 0.0], [0.0, 2.0]])));
        let vectors = snap.vectors_2d.unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!((vectors[0].x, vectors[0].y), (1.0, 1.0));
        assert_eq!(vectors[0].label, "u");
    }

    #[test]
    fn test_empty_object_token_is_a_noop() {
        // base64 of {}
        let snap = decode("e30=").unwrap();
        assert_eq!(snap, Snapshot::default());
        let mut scene = Scene::default();
        snap.apply_to(&mut scene);
        assert_eq!(scene, Scene::default());
    }
}
