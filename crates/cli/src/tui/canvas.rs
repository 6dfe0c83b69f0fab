// Canvas geometry: the lines and labels the lab canvas draws each frame.
//
// Everything is computed in scene coordinates; the ratatui canvas widget
// maps them to terminal cells. Linear maps take line segments to line
// segments, so transforming the two endpoints is enough for the grid.

use ratatui::style::Color;

use matrixlab_core::{Mat2, Mat3, Mode};
use matrixlab_scene::Scene;

pub(crate) const AXIS_COLOR: Color = Color::DarkGray;
pub(crate) const GRID_COLOR: Color = Color::Rgb(55, 58, 75);
pub(crate) const DIM_VECTOR_COLOR: Color = Color::Rgb(110, 110, 120);

/// One line segment in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Color,
}

/// A text label anchored at a scene coordinate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CanvasLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Color,
}

#[derive(Debug, Default)]
pub(crate) struct SceneGeometry {
    pub segments: Vec<Segment>,
    pub labels: Vec<CanvasLabel>,
}

/// Parse a `#rrggbb` display color. Anything else falls back to white.
pub(crate) fn hex_to_color(hex: &str) -> Color {
    fn parse(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }
    parse(hex).unwrap_or(Color::White)
}

/// Fixed-elevation orbit view for 3D mode. `[` and `]` change the yaw.
#[derive(Debug, Clone, Copy)]
pub(crate) struct View3 {
    /// Rotation about the z axis, radians.
    pub yaw: f64,
    /// Camera elevation above the xy plane, radians.
    pub elevation: f64,
}

impl Default for View3 {
    fn default() -> Self {
        View3 {
            yaw: -0.6,
            elevation: 1.0,
        }
    }
}

impl View3 {
    pub fn orbit(&mut self, delta: f64) {
        self.yaw += delta;
    }

    /// Orthographic projection: yaw about z, then tilt, depth dropped.
    pub fn project(&self, x: f64, y: f64, z: f64) -> (f64, f64) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let x1 = x * cos_yaw + y * sin_yaw;
        let y1 = -x * sin_yaw + y * cos_yaw;
        let (sin_el, cos_el) = self.elevation.sin_cos();
        (x1, y1 * sin_el + z * cos_el)
    }
}

pub(crate) fn geometry(scene: &Scene, extent: f64, view: &View3) -> SceneGeometry {
    match scene.mode {
        Mode::TwoD => geometry_2d(scene, extent),
        Mode::ThreeD => geometry_3d(scene, extent, view),
    }
}

fn geometry_2d(scene: &Scene, extent: f64) -> SceneGeometry {
    let mut geo = SceneGeometry::default();
    let m = &scene.matrix_2d;
    let e = extent;

    // Axes
    geo.segments.push(seg((-e, 0.0), (e, 0.0), AXIS_COLOR));
    geo.segments.push(seg((0.0, -e), (0.0, e), AXIS_COLOR));

    // Unit grid, sheared by A
    if scene.show_grid {
        let n = e.floor() as i64;
        for i in -n..=n {
            let i = i as f64;
            geo.segments
                .push(seg(m.apply(i, -e), m.apply(i, e), GRID_COLOR));
            geo.segments
                .push(seg(m.apply(-e, i), m.apply(e, i), GRID_COLOR));
        }
    }

    // Original vectors (dim), then their images (bright, labeled)
    for v in &scene.vectors_2d {
        geo.segments
            .push(seg((0.0, 0.0), (v.x, v.y), DIM_VECTOR_COLOR));
    }
    for v in &scene.vectors_2d {
        let t = v.transformed(m);
        let color = hex_to_color(&t.color);
        geo.segments.push(seg((0.0, 0.0), (t.x, t.y), color));
        geo.labels.push(CanvasLabel {
            x: t.x,
            y: t.y,
            text: t.label.clone(),
            color,
        });
    }

    geo
}

fn geometry_3d(scene: &Scene, extent: f64, view: &View3) -> SceneGeometry {
    let mut geo = SceneGeometry::default();
    let m = &scene.matrix_3d;
    let e = extent;

    let project_seg = |a: (f64, f64, f64), b: (f64, f64, f64), color: Color| {
        let (x1, y1) = view.project(a.0, a.1, a.2);
        let (x2, y2) = view.project(b.0, b.1, b.2);
        seg((x1, y1), (x2, y2), color)
    };

    // Axes through the origin, labeled at the positive end
    geo.segments
        .push(project_seg((-e, 0.0, 0.0), (e, 0.0, 0.0), AXIS_COLOR));
    geo.segments
        .push(project_seg((0.0, -e, 0.0), (0.0, e, 0.0), AXIS_COLOR));
    geo.segments
        .push(project_seg((0.0, 0.0, -e), (0.0, 0.0, e), AXIS_COLOR));
    for (axis, point) in [("x", (e, 0.0, 0.0)), ("y", (0.0, e, 0.0)), ("z", (0.0, 0.0, e))] {
        let (x, y) = view.project(point.0, point.1, point.2);
        geo.labels.push(CanvasLabel {
            x,
            y,
            text: axis.to_string(),
            color: AXIS_COLOR,
        });
    }

    // The xy-plane unit grid under A, projected
    if scene.show_grid {
        let n = e.floor() as i64;
        for i in -n..=n {
            let i = i as f64;
            geo.segments.push(project_seg(
                m.apply(i, -e, 0.0),
                m.apply(i, e, 0.0),
                GRID_COLOR,
            ));
            geo.segments.push(project_seg(
                m.apply(-e, i, 0.0),
                m.apply(e, i, 0.0),
                GRID_COLOR,
            ));
        }
    }

    for v in &scene.vectors_3d {
        geo.segments.push(project_seg(
            (0.0, 0.0, 0.0),
            (v.x, v.y, v.z),
            DIM_VECTOR_COLOR,
        ));
    }
    for v in &scene.vectors_3d {
        let t = v.transformed(m);
        let color = hex_to_color(&t.color);
        geo.segments
            .push(project_seg((0.0, 0.0, 0.0), (t.x, t.y, t.z), color));
        let (x, y) = view.project(t.x, t.y, t.z);
        geo.labels.push(CanvasLabel {
            x,
            y,
            text: t.label.clone(),
            color,
        });
    }

    geo
}

fn seg(a: (f64, f64), b: (f64, f64), color: Color) -> Segment {
    Segment {
        x1: a.0,
        y1: a.1,
        x2: b.0,
        y2: b.1,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrixlab_core::Mat2;

    const EPS: f64 = 1e-9;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_to_color("#f43f5e"), Color::Rgb(0xf4, 0x3f, 0x5e));
        assert_eq!(hex_to_color("10b981"), Color::Rgb(0x10, 0xb9, 0x81));
        // Garbage falls back instead of panicking mid-draw.
        assert_eq!(hex_to_color("#fff"), Color::White);
        assert_eq!(hex_to_color("not a color"), Color::White);
    }

    #[test]
    fn project_at_zero_yaw_keeps_x() {
        let view = View3 {
            yaw: 0.0,
            elevation: std::f64::consts::FRAC_PI_2,
        };
        // Straight-down elevation: the xy plane projects to itself.
        let (x, y) = view.project(2.0, 3.0, 0.0);
        assert!((x - 2.0).abs() < EPS);
        assert!((y - 3.0).abs() < EPS);
        // z is all depth from straight above.
        let (_, yz) = view.project(0.0, 0.0, 5.0);
        assert!(yz.abs() < EPS);
    }

    #[test]
    fn project_z_goes_up_at_low_elevation() {
        let view = View3 {
            yaw: 0.0,
            elevation: 0.0,
        };
        let (x, y) = view.project(0.0, 0.0, 1.0);
        assert!(x.abs() < EPS);
        assert!((y - 1.0).abs() < EPS);
    }

    #[test]
    fn grid_toggle_changes_segment_count() {
        let mut scene = Scene::default();
        let with_grid = geometry(&scene, 5.0, &View3::default()).segments.len();
        scene.show_grid = false;
        let without = geometry(&scene, 5.0, &View3::default()).segments.len();
        // 2 axes + 3 vectors original + 3 transformed
        assert_eq!(without, 8);
        // 11 vertical + 11 horizontal grid lines at extent 5
        assert_eq!(with_grid, without + 22);
    }

    #[test]
    fn transformed_vectors_carry_their_colors_and_labels() {
        let mut scene = Scene::default();
        scene.matrix_2d = Mat2([[2.0, 0.0], [0.0, 2.0]]);
        let geo = geometry(&scene, 5.0, &View3::default());
        let u = geo.labels.iter().find(|l| l.text == "u").unwrap();
        assert_eq!((u.x, u.y), (2.0, 0.0));
        assert_eq!(u.color, Color::Rgb(0xf4, 0x3f, 0x5e));
    }

    #[test]
    fn geometry_3d_labels_axes_and_vectors() {
        let mut scene = Scene::default();
        scene.mode = matrixlab_core::Mode::ThreeD;
        let geo = geometry(&scene, 5.0, &View3::default());
        let texts: Vec<&str> = geo.labels.iter().map(|l| l.text.as_str()).collect();
        for t in ["x", "y", "z", "u", "v", "w"] {
            assert!(texts.contains(&t), "missing label {:?}", t);
        }
    }
}
