// Prompt construction for the insight request.
//
// The matrix is serialized the compact way foreign encoders write it
// ([[2,0],[0,2]]) and vectors as "label(x, y)" so the model sees the
// same text regardless of which surface asked.

use matrixlab_core::{Mat2, Mat3, Vector2, Vector3};

/// The matrix and vectors an insight is requested for.
#[derive(Debug, Clone)]
pub enum InsightSubject {
    TwoD { matrix: Mat2, vectors: Vec<Vector2> },
    ThreeD { matrix: Mat3, vectors: Vec<Vector3> },
}

/// Integer-valued entries print without a trailing ".0".
fn fmt_entry(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl InsightSubject {
    pub fn mode_label(&self) -> &'static str {
        match self {
            InsightSubject::TwoD { .. } => "2D",
            InsightSubject::ThreeD { .. } => "3D",
        }
    }

    /// Compact row-array form, e.g. `[[2,0],[0,2]]`.
    pub fn matrix_text(&self) -> String {
        fn rows(rows: &[&[f64]]) -> String {
            let body = rows
                .iter()
                .map(|row| {
                    let entries = row
                        .iter()
                        .map(|e| fmt_entry(*e))
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("[{}]", entries)
                })
                .collect::<Vec<_>>()
                .join(",");
            format!("[{}]", body)
        }

        match self {
            InsightSubject::TwoD { matrix, .. } => {
                rows(&[&matrix.0[0], &matrix.0[1]])
            }
            InsightSubject::ThreeD { matrix, .. } => {
                rows(&[&matrix.0[0], &matrix.0[1], &matrix.0[2]])
            }
        }
    }

    /// Labeled coordinate list, e.g. `u(1, 0), v(0, 1), w(1, 1)`.
    pub fn vectors_text(&self) -> String {
        match self {
            InsightSubject::TwoD { vectors, .. } => vectors
                .iter()
                .map(|v| format!("{}({}, {})", v.label, fmt_entry(v.x), fmt_entry(v.y)))
                .collect::<Vec<_>>()
                .join(", "),
            InsightSubject::ThreeD { vectors, .. } => vectors
                .iter()
                .map(|v| {
                    format!(
                        "{}({}, {}, {})",
                        v.label,
                        fmt_entry(v.x),
                        fmt_entry(v.y),
                        fmt_entry(v.z)
                    )
                })
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Build the user prompt for an insight request.
pub fn build_prompt(subject: &InsightSubject) -> String {
    format!(
        "Analyze the linear transformation represented by the matrix {}.\n\
         The current vectors in the space are: {}.\n\
         Explain what this transformation does geometrically (rotation, scaling, shear, projection, etc.).\n\
         Calculate the determinant and explain its meaning regarding volume/area change.\n\
         If it's 3D, mention the orientation.\n\
         Format the response as a clear educational summary for a student.",
        subject.matrix_text(),
        subject.vectors_text()
    )
}
