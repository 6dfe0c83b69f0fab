// Matrix Lab CLI - interactive visualizer plus headless commands

mod exit_codes;
mod tui;
mod util;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use matrixlab_core::{Mat2, Mat3, Mode};
use matrixlab_insight::{InsightError, InsightSubject};
use matrixlab_scene::{Scene, PRESETS_2D, PRESETS_3D};
use matrixlab_share::{ShareError, Snapshot};

use exit_codes::{
    insight_exit_code, EXIT_ERROR, EXIT_SHARE_MALFORMED, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "mlab")]
#[command(about = "Interactive visualizer for 2D/3D linear transformations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive visualizer
    #[command(after_help = "\
Examples:
  mlab lab
  mlab lab --snapshot eyJtb2RlIjoiM0QifQ==")]
    Lab {
        /// Restore state from a share token (malformed tokens are ignored)
        #[arg(long)]
        snapshot: Option<String>,
    },

    /// Print determinant, trace and Frobenius norm of a matrix
    #[command(after_help = "\
Matrices are given row by row: entries separated by commas, rows by
semicolons. Two rows of two make a 2x2, three rows of three a 3x3.

Examples:
  mlab analyze --matrix '2,0;0,2'
  mlab analyze --matrix '1,0,0;0,1,0;0,0,1' --json
  mlab analyze --snapshot TOKEN")]
    Analyze {
        /// Matrix as 'a,b;c,d' (2x2) or 'a,b,c;d,e,f;g,h,i' (3x3)
        #[arg(long)]
        matrix: Option<String>,

        /// Take the matrix from a share token instead
        #[arg(long)]
        snapshot: Option<String>,

        /// Emit one JSON object on stdout
        #[arg(long)]
        json: bool,
    },

    /// Apply a matrix to vectors and print their images
    #[command(after_help = "\
Examples:
  mlab apply --matrix '2,0;0,2' --vector 1,1
  mlab apply --matrix '0,-1;1,0' --vector 1,0 --vector 0,1 --json
  mlab apply --snapshot TOKEN")]
    Apply {
        /// Matrix as 'a,b;c,d' (2x2) or three-row form (3x3)
        #[arg(long)]
        matrix: Option<String>,

        /// Take matrix and vectors from a share token instead
        #[arg(long)]
        snapshot: Option<String>,

        /// Vector as 'x,y' or 'x,y,z'; repeatable
        #[arg(long)]
        vector: Vec<String>,

        /// Emit one JSON array on stdout
        #[arg(long)]
        json: bool,
    },

    /// Encode and decode share tokens
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },

    /// List the named preset transformations
    Presets {
        /// Emit one JSON object on stdout
        #[arg(long)]
        json: bool,
    },

    /// Ask the configured AI provider to explain a transformation
    #[command(after_help = "\
Requires ai.provider in settings.json and the provider's key in the
environment (e.g. MATRIXLAB_GEMINI_KEY). See `mlab ai doctor`.

Examples:
  mlab insight --matrix '0,-1;1,0'
  mlab insight --snapshot TOKEN --json")]
    Insight {
        /// Matrix as 'a,b;c,d' (2x2) or three-row form (3x3)
        #[arg(long)]
        matrix: Option<String>,

        /// Take matrix and vectors from a share token instead
        #[arg(long)]
        snapshot: Option<String>,

        /// Emit one JSON object on stdout
        #[arg(long)]
        json: bool,
    },

    /// AI configuration and diagnostics
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Subcommand)]
enum ShareCommands {
    /// Build a share token from a snapshot JSON file (or the default scene)
    #[command(after_help = "\
The file holds the token payload shape:
  {\"mode\": \"2D\", \"matrix2D\": [[2,0],[0,2]], \"vectors2D\": [...]}
Absent fields keep their defaults.

Examples:
  mlab share encode
  mlab share encode scene.json --json")]
    Encode {
        /// Snapshot JSON file (omit for the default scene)
        file: Option<PathBuf>,

        /// Emit one JSON object on stdout
        #[arg(long)]
        json: bool,
    },

    /// Decode a share token and print its payload
    Decode {
        /// The token to decode
        token: String,

        /// Emit the payload as one JSON object on stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Report provider, model, key source and readiness
    Doctor {
        /// Emit one JSON object on stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: mlab <command> [options]");
            eprintln!("       mlab --help for more information");
            Ok(())
        }
        Some(Commands::Lab { snapshot }) => cmd_lab(snapshot),
        Some(Commands::Analyze {
            matrix,
            snapshot,
            json,
        }) => cmd_analyze(matrix, snapshot, json),
        Some(Commands::Apply {
            matrix,
            snapshot,
            vector,
            json,
        }) => cmd_apply(matrix, snapshot, vector, json),
        Some(Commands::Share { command }) => match command {
            ShareCommands::Encode { file, json } => cmd_share_encode(file, json),
            ShareCommands::Decode { token, json } => cmd_share_decode(token, json),
        },
        Some(Commands::Presets { json }) => cmd_presets(json),
        Some(Commands::Insight {
            matrix,
            snapshot,
            json,
        }) => cmd_insight(matrix, snapshot, json),
        Some(Commands::Ai { command }) => match command {
            AiCommands::Doctor { json } => cmd_ai_doctor(json),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    /// Malformed share token on a headless path.
    pub fn share(err: ShareError) -> Self {
        Self {
            code: EXIT_SHARE_MALFORMED,
            message: err.to_string(),
            hint: None,
        }
    }

    /// Insight failure with its exit code from the registry.
    pub fn insight(err: InsightError) -> Self {
        let hint = match &err {
            InsightError::NotConfigured(_) => {
                Some("set ai.provider in settings.json (see `mlab ai doctor`)".to_string())
            }
            InsightError::MissingKey => {
                Some("export the provider key, e.g. MATRIXLAB_GEMINI_KEY".to_string())
            }
            _ => None,
        };
        Self {
            code: insight_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Argument parsing
// ============================================================================

/// A matrix given on the command line, sized by its row layout.
#[derive(Debug, Clone, Copy, PartialEq)]
enum MatrixArg {
    Two(Mat2),
    Three(Mat3),
}

impl MatrixArg {
    fn mode(&self) -> Mode {
        match self {
            MatrixArg::Two(_) => Mode::TwoD,
            MatrixArg::Three(_) => Mode::ThreeD,
        }
    }

    fn rows(&self) -> Vec<Vec<f64>> {
        match self {
            MatrixArg::Two(m) => m.0.iter().map(|r| r.to_vec()).collect(),
            MatrixArg::Three(m) => m.0.iter().map(|r| r.to_vec()).collect(),
        }
    }
}

/// Strict entry parsing for scripts: a typo is a usage error, not a zero.
fn parse_number(s: &str) -> Result<f64, CliError> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| CliError::args(format!("not a number: {:?}", s.trim())))?;
    if !v.is_finite() {
        return Err(CliError::args(format!("entry must be finite: {:?}", s.trim())));
    }
    Ok(v)
}

/// Parse 'a,b;c,d' (2x2) or 'a,b,c;d,e,f;g,h,i' (3x3).
fn parse_matrix_arg(s: &str) -> Result<MatrixArg, CliError> {
    let rows: Vec<Vec<f64>> = s
        .split(';')
        .map(|row| row.split(',').map(parse_number).collect())
        .collect::<Result<_, _>>()?;

    match rows.as_slice() {
        [r0, r1] if r0.len() == 2 && r1.len() == 2 => Ok(MatrixArg::Two(Mat2([
            [r0[0], r0[1]],
            [r1[0], r1[1]],
        ]))),
        [r0, r1, r2] if r0.len() == 3 && r1.len() == 3 && r2.len() == 3 => {
            Ok(MatrixArg::Three(Mat3([
                [r0[0], r0[1], r0[2]],
                [r1[0], r1[1], r1[2]],
                [r2[0], r2[1], r2[2]],
            ])))
        }
        _ => Err(CliError::args(format!("matrix must be square, got {:?}", s))
            .with_hint("write 2 rows of 2 entries ('a,b;c,d') or 3 rows of 3")),
    }
}

/// Parse 'x,y' or 'x,y,z'.
fn parse_vector_arg(s: &str) -> Result<Vec<f64>, CliError> {
    let coords: Vec<f64> = s
        .split(',')
        .map(parse_number)
        .collect::<Result<_, _>>()?;
    match coords.len() {
        2 | 3 => Ok(coords),
        n => Err(CliError::args(format!(
            "vector needs 2 or 3 coordinates, got {} in {:?}",
            n, s
        ))),
    }
}

/// Resolve the matrix (and the vectors that go with it) from either a
/// `--matrix` argument or a `--snapshot` token.
fn resolve_subject(
    matrix: Option<String>,
    snapshot: Option<String>,
) -> Result<InsightSubject, CliError> {
    match (matrix, snapshot) {
        (Some(_), Some(_)) => {
            Err(CliError::args("--matrix and --snapshot are mutually exclusive"))
        }
        (Some(m), None) => {
            // Initial vectors stand in for the editor's vector set.
            match parse_matrix_arg(&m)? {
                MatrixArg::Two(matrix) => Ok(InsightSubject::TwoD {
                    matrix,
                    vectors: matrixlab_scene::initial_vectors_2d(),
                }),
                MatrixArg::Three(matrix) => Ok(InsightSubject::ThreeD {
                    matrix,
                    vectors: matrixlab_scene::initial_vectors_3d(),
                }),
            }
        }
        (None, Some(token)) => {
            let snap = matrixlab_share::decode(&token).map_err(CliError::share)?;
            let mut scene = Scene::default();
            snap.apply_to(&mut scene);
            Ok(match scene.mode {
                Mode::TwoD => InsightSubject::TwoD {
                    matrix: scene.matrix_2d,
                    vectors: scene.vectors_2d,
                },
                Mode::ThreeD => InsightSubject::ThreeD {
                    matrix: scene.matrix_3d,
                    vectors: scene.vectors_3d,
                },
            })
        }
        (None, None) => Err(CliError::args("either --matrix or --snapshot is required")),
    }
}

// ============================================================================
// lab
// ============================================================================

fn cmd_lab(snapshot: Option<String>) -> Result<(), CliError> {
    let settings = matrixlab_config::settings::Settings::load();

    let mut scene = Scene::default();
    scene.show_grid = settings.show_grid;

    // A bad token degrades to defaults; the session still starts.
    let mut notice = None;
    if let Some(token) = snapshot {
        match matrixlab_share::decode(&token) {
            Ok(snap) => snap.apply_to(&mut scene),
            Err(e) => {
                eprintln!("warning: ignoring snapshot: {}", e);
                notice = Some("snapshot ignored (malformed token)".to_string());
            }
        }
    }

    tui::run(scene, &settings, notice).map_err(CliError::io)
}

// ============================================================================
// analyze
// ============================================================================

fn cmd_analyze(
    matrix: Option<String>,
    snapshot: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let subject = resolve_subject(matrix, snapshot)?;

    let (mode, rows, det, trace, frob) = match &subject {
        InsightSubject::TwoD { matrix, .. } => (
            Mode::TwoD,
            MatrixArg::Two(*matrix).rows(),
            matrix.determinant(),
            matrix.trace(),
            matrix.frobenius_norm(),
        ),
        InsightSubject::ThreeD { matrix, .. } => (
            Mode::ThreeD,
            MatrixArg::Three(*matrix).rows(),
            matrix.determinant(),
            matrix.trace(),
            matrix.frobenius_norm(),
        ),
    };

    if json {
        let out = serde_json::json!({
            "mode": mode,
            "matrix": rows,
            "determinant": det,
            "trace": trace,
            "frobeniusNorm": frob,
        });
        println!("{}", out);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut w = stdout.lock();
    for line in util::fmt_matrix_rows(&rows) {
        writeln!(w, "{}", line).map_err(|e| CliError::io(e.to_string()))?;
    }
    writeln!(w).map_err(|e| CliError::io(e.to_string()))?;
    writeln!(w, "determinant:    {}", util::fmt_num(det))
        .map_err(|e| CliError::io(e.to_string()))?;
    writeln!(w, "trace:          {}", util::fmt_num(trace))
        .map_err(|e| CliError::io(e.to_string()))?;
    writeln!(w, "frobenius norm: {}", util::fmt_num(frob))
        .map_err(|e| CliError::io(e.to_string()))?;
    Ok(())
}

// ============================================================================
// apply
// ============================================================================

fn cmd_apply(
    matrix: Option<String>,
    snapshot: Option<String>,
    vector_args: Vec<String>,
    json: bool,
) -> Result<(), CliError> {
    let subject = resolve_subject(matrix, snapshot)?;

    // (label, input coords, output coords) per vector
    let mut results: Vec<(String, Vec<f64>, Vec<f64>)> = Vec::new();

    if vector_args.is_empty() {
        // Use the subject's own vector set (initial vectors for --matrix,
        // the token's set for --snapshot).
        match &subject {
            InsightSubject::TwoD { matrix, vectors } => {
                for v in vectors {
                    let t = v.transformed(matrix);
                    results.push((v.label.clone(), vec![v.x, v.y], vec![t.x, t.y]));
                }
            }
            InsightSubject::ThreeD { matrix, vectors } => {
                for v in vectors {
                    let t = v.transformed(matrix);
                    results.push((
                        v.label.clone(),
                        vec![v.x, v.y, v.z],
                        vec![t.x, t.y, t.z],
                    ));
                }
            }
        }
    } else {
        for (i, arg) in vector_args.iter().enumerate() {
            let coords = parse_vector_arg(arg)?;
            let label = format!("v{}", i + 1);
            match &subject {
                InsightSubject::TwoD { matrix, .. } => {
                    if coords.len() != 2 {
                        return Err(CliError::args(format!(
                            "vector {:?} has 3 coordinates but the matrix is 2x2",
                            arg
                        )));
                    }
                    let (x, y) = matrix.apply(coords[0], coords[1]);
                    results.push((label, coords, vec![x, y]));
                }
                InsightSubject::ThreeD { matrix, .. } => {
                    if coords.len() != 3 {
                        return Err(CliError::args(format!(
                            "vector {:?} has 2 coordinates but the matrix is 3x3",
                            arg
                        )));
                    }
                    let (x, y, z) = matrix.apply(coords[0], coords[1], coords[2]);
                    results.push((label, coords, vec![x, y, z]));
                }
            }
        }
    }

    if json {
        let out: Vec<serde_json::Value> = results
            .iter()
            .map(|(label, input, output)| {
                serde_json::json!({
                    "label": label,
                    "input": input,
                    "output": output,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(out));
        return Ok(());
    }

    let fmt_coords = |coords: &[f64]| {
        coords
            .iter()
            .map(|c| util::fmt_num(*c))
            .collect::<Vec<_>>()
            .join(", ")
    };
    for (label, input, output) in &results {
        println!("{}: ({}) -> ({})", label, fmt_coords(input), fmt_coords(output));
    }
    Ok(())
}

// ============================================================================
// share
// ============================================================================

fn cmd_share_encode(file: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let mut scene = Scene::default();

    if let Some(path) = &file {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
        let snap: Snapshot = serde_json::from_str(&text)
            .map_err(|e| CliError::args(format!("{}: {}", path.display(), e))
                .with_hint("the file holds the token payload shape, e.g. {\"mode\": \"2D\", \"matrix2D\": [[2,0],[0,2]]}"))?;
        snap.apply_to(&mut scene);
    }

    let token = matrixlab_share::encode(&scene).map_err(CliError::share)?;

    if json {
        println!("{}", serde_json::json!({ "token": token }));
    } else {
        println!("{}", token);
    }
    Ok(())
}

fn cmd_share_decode(token: String, json: bool) -> Result<(), CliError> {
    let snap = matrixlab_share::decode(&token).map_err(CliError::share)?;

    if json {
        let out = serde_json::to_value(&snap)
            .map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    let mut scene = Scene::default();
    snap.apply_to(&mut scene);

    println!("mode: {}", scene.mode.label());
    println!();
    println!("matrix ({}):", scene.mode.label());
    let rows: Vec<Vec<f64>> = match scene.mode {
        Mode::TwoD => scene.matrix_2d.0.iter().map(|r| r.to_vec()).collect(),
        Mode::ThreeD => scene.matrix_3d.0.iter().map(|r| r.to_vec()).collect(),
    };
    for line in util::fmt_matrix_rows(&rows) {
        println!("  {}", line);
    }
    println!();
    println!("vectors:");
    match scene.mode {
        Mode::TwoD => {
            for v in &scene.vectors_2d {
                println!(
                    "  {} ({}, {})  {}",
                    v.label,
                    util::fmt_num(v.x),
                    util::fmt_num(v.y),
                    v.color
                );
            }
        }
        Mode::ThreeD => {
            for v in &scene.vectors_3d {
                println!(
                    "  {} ({}, {}, {})  {}",
                    v.label,
                    util::fmt_num(v.x),
                    util::fmt_num(v.y),
                    util::fmt_num(v.z),
                    v.color
                );
            }
        }
    }
    Ok(())
}

// ============================================================================
// presets
// ============================================================================

fn cmd_presets(json: bool) -> Result<(), CliError> {
    if json {
        let to_value2 = |p: &matrixlab_scene::Preset2| {
            serde_json::json!({ "name": p.name, "label": p.label, "matrix": p.matrix })
        };
        let to_value3 = |p: &matrixlab_scene::Preset3| {
            serde_json::json!({ "name": p.name, "label": p.label, "matrix": p.matrix })
        };
        let out = serde_json::json!({
            "2D": PRESETS_2D.iter().map(to_value2).collect::<Vec<_>>(),
            "3D": PRESETS_3D.iter().map(to_value3).collect::<Vec<_>>(),
        });
        println!("{}", out);
        return Ok(());
    }

    println!("2D presets:");
    for p in PRESETS_2D {
        let rows: Vec<Vec<f64>> = p.matrix.0.iter().map(|r| r.to_vec()).collect();
        let lines = util::fmt_matrix_rows(&rows);
        println!("  {:<12} {:<14} {}", p.name, p.label, lines.join("  "));
    }
    println!();
    println!("3D presets:");
    for p in PRESETS_3D {
        let rows: Vec<Vec<f64>> = p.matrix.0.iter().map(|r| r.to_vec()).collect();
        let lines = util::fmt_matrix_rows(&rows);
        println!("  {:<12} {:<14} {}", p.name, p.label, lines.join("  "));
    }
    Ok(())
}

// ============================================================================
// insight
// ============================================================================

fn cmd_insight(
    matrix: Option<String>,
    snapshot: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let subject = resolve_subject(matrix, snapshot)?;
    let config = matrixlab_config::ai::ResolvedAiConfig::load();

    let reply =
        matrixlab_insight::request_insight(&config, &subject).map_err(CliError::insight)?;

    for warning in &reply.warnings {
        eprintln!("warning: {}", warning);
    }

    if json {
        let out = serde_json::to_value(&reply.insight)
            .map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", reply.insight.title);
    println!("{}", "-".repeat(reply.insight.title.chars().count().max(4)));
    println!("{}", reply.insight.explanation);
    if !reply.insight.math_details.is_empty() {
        println!();
        println!("Key details:");
        for detail in &reply.insight.math_details {
            println!("  - {}", detail);
        }
    }
    Ok(())
}

// ============================================================================
// ai doctor
// ============================================================================

fn cmd_ai_doctor(json: bool) -> Result<(), CliError> {
    use matrixlab_config::ai::{AiDiagnostics, ResolvedAiConfig};

    let config = ResolvedAiConfig::load();
    let diag = AiDiagnostics::from_resolved(&config);

    if json {
        let out = serde_json::json!({
            "provider": diag.provider,
            "model": diag.model,
            "status": diag.status.as_str(),
            "ready": diag.status.is_ready(),
            "key_present": diag.key_present,
            "key_source": diag.key_source.as_str(),
            "endpoint": diag.endpoint,
            "blocking_reason": config.blocking_reason,
        });
        println!("{}", out);
        return Ok(());
    }

    print!("{}", diag);
    if let Some(reason) = &config.blocking_reason {
        println!("Blocked:     {}", reason);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_arg_2x2() {
        let m = parse_matrix_arg("2,0;0,2").unwrap();
        assert_eq!(m, MatrixArg::Two(Mat2([[2.0, 0.0], [0.0, 2.0]])));
        assert_eq!(m.mode(), Mode::TwoD);
    }

    #[test]
    fn matrix_arg_3x3_with_spaces() {
        let m = parse_matrix_arg("1, 0, 0; 0, 1, 0; 0, 0, 1").unwrap();
        assert_eq!(m, MatrixArg::Three(Mat3::identity()));
        assert_eq!(m.mode(), Mode::ThreeD);
    }

    #[test]
    fn matrix_arg_rejects_bad_shapes() {
        // Ragged rows
        assert_eq!(parse_matrix_arg("1,2;3").unwrap_err().code, EXIT_USAGE);
        // 2 rows of 3
        assert_eq!(
            parse_matrix_arg("1,2,3;4,5,6").unwrap_err().code,
            EXIT_USAGE
        );
        // Not numbers: scripts get an error, not silent zeros
        assert_eq!(parse_matrix_arg("a,b;c,d").unwrap_err().code, EXIT_USAGE);
        // Non-finite entries
        assert_eq!(parse_matrix_arg("inf,0;0,1").unwrap_err().code, EXIT_USAGE);
    }

    #[test]
    fn vector_arg_shapes() {
        assert_eq!(parse_vector_arg("1,0").unwrap(), vec![1.0, 0.0]);
        assert_eq!(parse_vector_arg("1,2,-3.5").unwrap(), vec![1.0, 2.0, -3.5]);
        assert_eq!(parse_vector_arg("1").unwrap_err().code, EXIT_USAGE);
        assert_eq!(parse_vector_arg("1,2,3,4").unwrap_err().code, EXIT_USAGE);
        assert_eq!(parse_vector_arg("x,y").unwrap_err().code, EXIT_USAGE);
    }

    #[test]
    fn subject_from_matrix_uses_initial_vectors() {
        let s = resolve_subject(Some("2,0;0,2".to_string()), None).unwrap();
        match s {
            InsightSubject::TwoD { vectors, .. } => {
                assert_eq!(vectors.len(), 3);
                assert_eq!(vectors[0].label, "u");
            }
            _ => panic!("expected 2D subject"),
        }
    }

    #[test]
    fn subject_from_snapshot_uses_token_mode() {
        // base64 of {"mode":"3D"}
        let s = resolve_subject(None, Some("eyJtb2RlIjoiM0QifQ==".to_string())).unwrap();
        assert!(matches!(s, InsightSubject::ThreeD { .. }));
    }

    #[test]
    fn subject_requires_exactly_one_source() {
        assert_eq!(resolve_subject(None, None).unwrap_err().code, EXIT_USAGE);
        assert_eq!(
            resolve_subject(Some("1,0;0,1".to_string()), Some("e30=".to_string()))
                .unwrap_err()
                .code,
            EXIT_USAGE
        );
    }

    #[test]
    fn subject_from_bad_token_maps_to_share_exit() {
        let err = resolve_subject(None, Some("!!garbage!!".to_string())).unwrap_err();
        assert_eq!(err.code, EXIT_SHARE_MALFORMED);
    }
}
