// The lab: a full-screen terminal visualizer with a canvas on the left
// and a tabbed control panel on the right. Single event loop, 100ms tick;
// the only background work is the insight request, one thread per call,
// answered over an mpsc channel drained by the loop.

pub mod canvas;

use std::io::stdout;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame, Terminal,
};

use matrixlab_config::ai::ResolvedAiConfig;
use matrixlab_config::settings::Settings;
use matrixlab_core::Mode;
use matrixlab_insight::{Insight, InsightError, InsightReply, InsightSubject};
use matrixlab_scene::{parse_entry, Axis, Scene, PRESETS_2D, PRESETS_3D};

use crate::util;
use canvas::View3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Transform,
    Operations,
    Analysis,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Transform, Tab::Operations, Tab::Analysis];

    fn label(&self) -> &'static str {
        match self {
            Tab::Transform => "Transform",
            Tab::Operations => "Operations",
            Tab::Analysis => "Analysis",
        }
    }

    fn next(&self) -> Tab {
        match self {
            Tab::Transform => Tab::Operations,
            Tab::Operations => Tab::Analysis,
            Tab::Analysis => Tab::Transform,
        }
    }

    fn prev(&self) -> Tab {
        match self {
            Tab::Transform => Tab::Analysis,
            Tab::Operations => Tab::Transform,
            Tab::Analysis => Tab::Operations,
        }
    }
}

/// An editable field on the control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    MatrixA { row: usize, col: usize },
    MatrixB { row: usize, col: usize },
    Vector { index: usize, axis: Axis },
}

struct LabApp {
    scene: Scene,
    tab: Tab,
    /// Focused field as (row, col) into `field_rows()`.
    frow: usize,
    fcol: usize,
    /// In-place numeric entry buffer for the focused field.
    edit: Option<String>,
    preset_cursor: usize,
    view: View3,
    extent: f64,
    ai: ResolvedAiConfig,
    insight: Option<Insight>,
    insight_error: Option<String>,
    insight_loading: bool,
    insight_rx: Option<mpsc::Receiver<Result<InsightReply, InsightError>>>,
    token_popup: Option<String>,
    show_help: bool,
    status: Option<String>,
    should_quit: bool,
}

impl LabApp {
    fn new(scene: Scene, extent: f64, ai: ResolvedAiConfig) -> Self {
        LabApp {
            scene,
            tab: Tab::Transform,
            frow: 0,
            fcol: 0,
            edit: None,
            preset_cursor: 0,
            view: View3::default(),
            extent: extent.max(2.0),
            ai,
            insight: None,
            insight_error: None,
            insight_loading: false,
            insight_rx: None,
            token_popup: None,
            show_help: false,
            status: None,
            should_quit: false,
        }
    }

    fn size(&self) -> usize {
        self.scene.mode.size()
    }

    /// The editable fields of the active tab, laid out row by row.
    fn field_rows(&self) -> Vec<Vec<Field>> {
        let n = self.size();
        let mut rows = Vec::new();
        match self.tab {
            Tab::Transform => {
                for row in 0..n {
                    rows.push((0..n).map(|col| Field::MatrixA { row, col }).collect());
                }
                let axes: &[Axis] = if n == 2 {
                    &[Axis::X, Axis::Y]
                } else {
                    &[Axis::X, Axis::Y, Axis::Z]
                };
                for index in 0..self.scene.vector_count() {
                    rows.push(axes.iter().map(|&axis| Field::Vector { index, axis }).collect());
                }
            }
            Tab::Operations => {
                for row in 0..n {
                    rows.push((0..n).map(|col| Field::MatrixB { row, col }).collect());
                }
            }
            Tab::Analysis => {}
        }
        rows
    }

    fn focused(&self) -> Option<Field> {
        let rows = self.field_rows();
        let row = rows.get(self.frow)?;
        row.get(self.fcol.min(row.len().saturating_sub(1))).copied()
    }

    fn clamp_focus(&mut self) {
        let rows = self.field_rows();
        if rows.is_empty() {
            self.frow = 0;
            self.fcol = 0;
            return;
        }
        self.frow = self.frow.min(rows.len() - 1);
        self.fcol = self.fcol.min(rows[self.frow].len() - 1);
    }

    fn move_focus(&mut self, drow: i32, dcol: i32) {
        let rows = self.field_rows();
        if rows.is_empty() {
            return;
        }
        self.frow = (self.frow as i32 + drow).clamp(0, rows.len() as i32 - 1) as usize;
        let width = rows[self.frow].len() as i32;
        self.fcol = (self.fcol as i32 + dcol).clamp(0, width - 1) as usize;
    }

    fn field_value(&self, field: Field) -> f64 {
        match field {
            Field::MatrixA { row, col } => self.scene.entry(row, col),
            Field::MatrixB { row, col } => self.scene.b_entry(row, col),
            Field::Vector { index, axis } => {
                match self.scene.mode {
                    Mode::TwoD => self.scene.vectors_2d.get(index).map_or(0.0, |v| match axis {
                        Axis::X => v.x,
                        Axis::Y => v.y,
                        Axis::Z => 0.0,
                    }),
                    Mode::ThreeD => self.scene.vectors_3d.get(index).map_or(0.0, |v| match axis {
                        Axis::X => v.x,
                        Axis::Y => v.y,
                        Axis::Z => v.z,
                    }),
                }
            }
        }
    }

    /// Commit the edit buffer into the focused field. Garbage coerces to 0,
    /// the same leniency the matrix editor has always had.
    fn commit_edit(&mut self) {
        let (Some(buffer), Some(field)) = (self.edit.take(), self.focused()) else {
            self.edit = None;
            return;
        };
        let value = parse_entry(&buffer);
        match field {
            Field::MatrixA { row, col } => self.scene.set_entry(row, col, value),
            Field::MatrixB { row, col } => self.scene.set_b_entry(row, col, value),
            Field::Vector { index, axis } => self.scene.set_vector_coord(index, axis, value),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.scene.mode == mode {
            return;
        }
        self.edit = None;
        self.scene.mode = mode;
        self.preset_cursor = 0;
        self.clamp_focus();
    }

    fn cycle_preset(&mut self) {
        let (name, label) = match self.scene.mode {
            Mode::TwoD => {
                self.preset_cursor = (self.preset_cursor + 1) % PRESETS_2D.len();
                let p = &PRESETS_2D[self.preset_cursor];
                (p.name, p.label)
            }
            Mode::ThreeD => {
                self.preset_cursor = (self.preset_cursor + 1) % PRESETS_3D.len();
                let p = &PRESETS_3D[self.preset_cursor];
                (p.name, p.label)
            }
        };
        self.scene.apply_preset(name);
        self.status = Some(format!("preset: {}", label));
    }

    fn current_preset_label(&self) -> &'static str {
        match self.scene.mode {
            Mode::TwoD => PRESETS_2D[self.preset_cursor % PRESETS_2D.len()].label,
            Mode::ThreeD => PRESETS_3D[self.preset_cursor % PRESETS_3D.len()].label,
        }
    }

    fn subject(&self) -> InsightSubject {
        match self.scene.mode {
            Mode::TwoD => InsightSubject::TwoD {
                matrix: self.scene.matrix_2d,
                vectors: self.scene.vectors_2d.clone(),
            },
            Mode::ThreeD => InsightSubject::ThreeD {
                matrix: self.scene.matrix_3d,
                vectors: self.scene.vectors_3d.clone(),
            },
        }
    }

    /// Kick off one insight round trip on a background thread. The action
    /// is a no-op while a request is in flight (the loading flag doubles
    /// as the disabled state).
    fn request_insight(&mut self) {
        if self.insight_loading {
            return;
        }
        if !self.ai.status.is_ready() {
            self.status = Some(
                self.ai
                    .blocking_reason
                    .clone()
                    .unwrap_or_else(|| "AI is disabled (see `mlab ai doctor`)".to_string()),
            );
            return;
        }

        let config = self.ai.clone();
        let subject = self.subject();
        let (tx, rx) = mpsc::channel();
        self.insight_rx = Some(rx);
        self.insight_loading = true;
        self.insight_error = None;
        thread::spawn(move || {
            let _ = tx.send(matrixlab_insight::request_insight(&config, &subject));
        });
    }

    /// Drain a finished insight request, if any. Failure degrades to a
    /// message; the canvas and panels carry on.
    fn poll_insight(&mut self) {
        let Some(rx) = &self.insight_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(reply)) => {
                if !reply.warnings.is_empty() {
                    self.status = Some(reply.warnings.join("; "));
                }
                self.insight = Some(reply.insight);
                self.insight_error = None;
                self.insight_loading = false;
                self.insight_rx = None;
            }
            Ok(Err(err)) => {
                self.insight_error = Some(err.to_string());
                self.insight_loading = false;
                self.insight_rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.insight_error = Some("insight request was dropped".to_string());
                self.insight_loading = false;
                self.insight_rx = None;
            }
        }
    }

    fn show_share_token(&mut self) {
        match matrixlab_share::encode(&self.scene) {
            Ok(token) => self.token_popup = Some(token),
            Err(e) => self.status = Some(format!("cannot build token: {}", e)),
        }
    }

    fn reset_focused(&mut self) {
        match self.focused() {
            Some(Field::Vector { index, .. }) => {
                self.scene.reset_vector(index);
                self.status = Some(format!("vector {} reset", index + 1));
            }
            _ => {
                self.scene.reset_matrix();
                self.status = Some("matrix reset to identity".to_string());
            }
        }
    }

    fn reset_all(&mut self) {
        self.scene.reset_all();
        self.insight = None;
        self.insight_error = None;
        self.status = Some("everything reset".to_string());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.token_popup.is_some() {
            self.token_popup = None;
            return;
        }
        if self.edit.is_some() {
            self.handle_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.clamp_focus();
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                self.clamp_focus();
            }
            KeyCode::Char(c @ '1'..='3') => {
                self.tab = Tab::ALL[(c as usize) - ('1' as usize)];
                self.clamp_focus();
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_focus(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_focus(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_focus(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_focus(0, 1),
            KeyCode::Enter => {
                if self.focused().is_some() {
                    self.edit = Some(String::new());
                }
            }
            KeyCode::Char('m') => {
                let other = match self.scene.mode {
                    Mode::TwoD => Mode::ThreeD,
                    Mode::ThreeD => Mode::TwoD,
                };
                self.set_mode(other);
            }
            KeyCode::Char('g') => self.scene.toggle_grid(),
            KeyCode::Char('p') => self.cycle_preset(),
            KeyCode::Char('t') => {
                self.scene.transpose_active();
                self.status = Some("A transposed".to_string());
            }
            KeyCode::Char('x') => {
                self.scene.multiply_active();
                self.status = Some("A = A x B".to_string());
            }
            KeyCode::Char('i') => self.request_insight(),
            KeyCode::Char('s') => self.show_share_token(),
            KeyCode::Char('r') => self.reset_focused(),
            KeyCode::Char('R') => self.reset_all(),
            KeyCode::Char('[') => {
                if self.scene.mode == Mode::ThreeD {
                    self.view.orbit(-0.15);
                }
            }
            KeyCode::Char(']') => {
                if self.scene.mode == Mode::ThreeD {
                    self.view.orbit(0.15);
                }
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Esc => {
                self.edit = None;
            }
            KeyCode::Backspace => {
                if let Some(buf) = &mut self.edit {
                    buf.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || "+-.eE".contains(c) => {
                if let Some(buf) = &mut self.edit {
                    if buf.len() < 16 {
                        buf.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks =
            Layout::vertical([Constraint::Min(8), Constraint::Length(1)]).split(area);
        let main = Layout::horizontal([Constraint::Min(30), Constraint::Length(46)])
            .split(chunks[0]);

        self.draw_canvas(frame, main[0]);
        self.draw_panel(frame, main[1]);
        self.draw_status(frame, chunks[1]);

        if let Some(token) = &self.token_popup {
            self.draw_token_popup(frame, area, token);
        }
        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_canvas(&self, frame: &mut Frame, area: Rect) {
        let geo = canvas::geometry(&self.scene, self.extent, &self.view);
        let e = self.extent;
        let title = format!(" canvas [{}] ", self.scene.mode.label());

        let widget = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title),
            )
            .x_bounds([-e, e])
            .y_bounds([-e, e])
            .paint(|ctx| {
                for seg in &geo.segments {
                    ctx.draw(&CanvasLine {
                        x1: seg.x1,
                        y1: seg.y1,
                        x2: seg.x2,
                        y2: seg.y2,
                        color: seg.color,
                    });
                }
                for label in &geo.labels {
                    ctx.print(
                        label.x,
                        label.y,
                        Line::from(Span::styled(
                            label.text.clone(),
                            Style::default()
                                .fg(label.color)
                                .add_modifier(Modifier::BOLD),
                        )),
                    );
                }
            });
        frame.render_widget(widget, area);
    }

    fn draw_panel(&self, frame: &mut Frame, area: Rect) {
        let chunks =
            Layout::vertical([Constraint::Length(1), Constraint::Min(4)]).split(area);

        // Tab bar
        let mut spans = Vec::new();
        for (i, tab) in Tab::ALL.iter().enumerate() {
            let label = format!(" {}:{} ", i + 1, tab.label());
            if *tab == self.tab {
                spans.push(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(label, Style::default().fg(Color::Gray)));
            }
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

        let lines = match self.tab {
            Tab::Transform => self.transform_lines(),
            Tab::Operations => self.operations_lines(),
            Tab::Analysis => self.analysis_lines(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            chunks[1],
        );
    }

    /// A matrix or coordinate cell, highlighted when focused, showing the
    /// edit buffer while entry is in progress.
    fn cell_span(&self, field: Field) -> Span<'static> {
        let focused = self.focused() == Some(field);
        let text = if focused {
            if let Some(buf) = &self.edit {
                format!("{:>7}", format!("{}_", buf))
            } else {
                format!("{:>7}", util::fmt_num(self.field_value(field)))
            }
        } else {
            format!("{:>7}", util::fmt_num(self.field_value(field)))
        };
        let style = if focused && self.edit.is_some() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(text, style)
    }

    fn header(text: &str) -> Line<'static> {
        Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn hint_line(text: &str) -> Line<'static> {
        Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    }

    fn matrix_lines(&self, make: impl Fn(usize, usize) -> Field) -> Vec<Line<'static>> {
        let n = self.size();
        (0..n)
            .map(|row| {
                let mut spans = vec![Span::raw("  ")];
                for col in 0..n {
                    spans.push(self.cell_span(make(row, col)));
                    spans.push(Span::raw(" "));
                }
                Line::from(spans)
            })
            .collect()
    }

    fn transform_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Self::header(" Matrix A")];
        lines.extend(self.matrix_lines(|row, col| Field::MatrixA { row, col }));
        lines.push(Line::default());
        lines.push(Self::header(" Vectors"));

        let axes: &[Axis] = if self.size() == 2 {
            &[Axis::X, Axis::Y]
        } else {
            &[Axis::X, Axis::Y, Axis::Z]
        };
        let labels: Vec<String> = match self.scene.mode {
            Mode::TwoD => self.scene.vectors_2d.iter().map(|v| v.label.clone()).collect(),
            Mode::ThreeD => self.scene.vectors_3d.iter().map(|v| v.label.clone()).collect(),
        };
        for (index, label) in labels.iter().enumerate() {
            let mut spans = vec![Span::styled(
                format!("  {:<2}", label),
                Style::default().fg(Color::Gray),
            )];
            for &axis in axes {
                spans.push(self.cell_span(Field::Vector { index, axis }));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::default());
        lines.push(Self::hint_line(&format!(
            " p: preset ({})   t: transpose",
            self.current_preset_label()
        )));
        lines.push(Self::hint_line(" enter: edit cell   r: reset"));
        lines
    }

    fn operations_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Self::header(" Matrix B")];
        lines.extend(self.matrix_lines(|row, col| Field::MatrixB { row, col }));
        lines.push(Line::default());
        lines.push(Self::hint_line(" x: compute A = A x B"));
        lines.push(Line::default());
        lines.push(Self::header(" Norms |Av|"));

        // (label, norm) of each transformed vector
        let norms: Vec<(String, f64)> = match self.scene.mode {
            Mode::TwoD => self
                .scene
                .vectors_2d
                .iter()
                .map(|v| (v.label.clone(), v.transformed(&self.scene.matrix_2d).norm()))
                .collect(),
            Mode::ThreeD => self
                .scene
                .vectors_3d
                .iter()
                .map(|v| (v.label.clone(), v.transformed(&self.scene.matrix_3d).norm()))
                .collect(),
        };
        let max = norms.iter().map(|(_, n)| *n).fold(0.0f64, f64::max);
        for (label, norm) in &norms {
            let width = if max > 0.0 && norm.is_finite() {
                ((norm / max) * 20.0).round() as usize
            } else {
                0
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<2}", label), Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{:>8}  ", util::fmt_num(*norm)),
                    Style::default().fg(Color::White),
                ),
                Span::styled("█".repeat(width), Style::default().fg(Color::Cyan)),
            ]));
        }
        lines
    }

    fn analysis_lines(&self) -> Vec<Line<'static>> {
        let stats = self.scene.stats();
        let mut lines = vec![
            Self::header(" Properties"),
            Line::from(format!("  determinant:    {}", util::fmt_num(stats.determinant))),
            Line::from(format!("  trace:          {}", util::fmt_num(stats.trace))),
            Line::from(format!(
                "  frobenius norm: {}",
                util::fmt_num(stats.frobenius_norm)
            )),
            Line::default(),
        ];

        if self.insight_loading {
            lines.push(Line::from(Span::styled(
                " requesting insight...",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Self::hint_line(" i: request insight   s: share token"));
        }

        if let Some(err) = &self.insight_error {
            lines.push(Line::from(Span::styled(
                format!(" no insight available ({})", err),
                Style::default().fg(Color::Red),
            )));
        }

        if let Some(insight) = &self.insight {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!(" {}", insight.title),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(" {}", insight.explanation)));
            if !insight.math_details.is_empty() {
                lines.push(Line::default());
                lines.push(Self::header(" Key details"));
                for detail in &insight.math_details {
                    lines.push(Line::from(format!("  • {}", detail)));
                }
            }
        }

        lines.push(Line::default());
        lines.push(Self::hint_line(" g: grid   R: reset all"));
        lines
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let grid = if self.scene.show_grid { "on" } else { "off" };
        let message = self.status.as_deref().unwrap_or("");
        let left = format!(
            " {} | {} | grid {} | {}",
            self.scene.mode.label(),
            self.tab.label(),
            grid,
            message
        );
        let right = "?: help  q: quit ";
        let padding = (area.width as usize)
            .saturating_sub(left.chars().count() + right.chars().count());
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                status,
                Style::default().fg(Color::Black).bg(Color::DarkGray),
            )))
            .style(Style::default().bg(Color::DarkGray)),
            area,
        );
    }

    fn draw_token_popup(&self, frame: &mut Frame, area: Rect, token: &str) {
        let width: u16 = 60.min(area.width.saturating_sub(4)).max(20);
        let inner = width.saturating_sub(4) as usize;
        let text_height = token.len().div_ceil(inner.max(1)) as u16;
        let height = (text_height + 4).min(area.height);

        let x = area.width.saturating_sub(width) / 2;
        let y = area.height.saturating_sub(height) / 2;
        let popup = Rect::new(area.x + x, area.y + y, width, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Share token ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black));

        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                token.to_string(),
                Style::default().fg(Color::White),
            )),
            Line::default(),
            Line::from(Span::styled(
                "restore with: mlab lab --snapshot <token>",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            popup,
        );
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Tabs",
            "  ----",
            "  Tab / Shift+Tab   Next/prev tab",
            "  1 / 2 / 3         Transform / Operations / Analysis",
            "",
            "  Editing",
            "  -------",
            "  arrows / hjkl     Move between fields",
            "  Enter             Edit field, Enter commits, Esc cancels",
            "  p                 Cycle preset into A",
            "  t                 Transpose A",
            "  x                 A = A x B",
            "  r / R             Reset field's owner / reset everything",
            "",
            "  View",
            "  ----",
            "  m                 Switch 2D / 3D",
            "  g                 Toggle grid",
            "  [ / ]             Orbit the 3D view",
            "",
            "  Other",
            "  -----",
            "  i                 Request AI insight",
            "  s                 Show share token",
            "  q / Esc           Quit",
            "",
        ];
        let help_width: u16 = 58;
        let help_height: u16 = help_lines.len() as u16;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Run the lab until the user quits.
pub fn run(scene: Scene, settings: &Settings, notice: Option<String>) -> Result<(), String> {
    let ai = ResolvedAiConfig::from_settings(&settings.ai);
    let mut app = LabApp::new(scene, settings.canvas_extent, ai);
    app.status = notice;

    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        app.poll_insight();

        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) =
                event::read().map_err(|e| format!("event read error: {}", e))?
            {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use matrixlab_config::settings::AiSettings;
    use matrixlab_core::Mat2;

    fn app() -> LabApp {
        let ai = ResolvedAiConfig::from_settings(&AiSettings::default());
        LabApp::new(Scene::default(), 5.0, ai)
    }

    fn press(app: &mut LabApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut LabApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn transform_tab_edits_matrix_a() {
        let mut a = app();
        // Focus starts on A[0][0]; enter edit, type a value, commit.
        press(&mut a, KeyCode::Enter);
        type_text(&mut a, "2.5");
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.scene.matrix_2d.0[0][0], 2.5);
    }

    #[test]
    fn garbage_entry_coerces_to_zero() {
        let mut a = app();
        press(&mut a, KeyCode::Enter);
        type_text(&mut a, "..-");
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.scene.matrix_2d.0[0][0], 0.0);
    }

    #[test]
    fn esc_cancels_an_edit() {
        let mut a = app();
        press(&mut a, KeyCode::Enter);
        type_text(&mut a, "9");
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.scene.matrix_2d.0[0][0], 1.0);
        assert!(!a.should_quit);
    }

    #[test]
    fn focus_walks_from_matrix_into_vectors() {
        let mut a = app();
        // 2 matrix rows, then 3 vector rows.
        press(&mut a, KeyCode::Down);
        press(&mut a, KeyCode::Down);
        assert!(matches!(
            a.focused(),
            Some(Field::Vector { index: 0, axis: Axis::X })
        ));
        press(&mut a, KeyCode::Right);
        press(&mut a, KeyCode::Enter);
        type_text(&mut a, "4");
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.scene.vectors_2d[0].y, 4.0);
    }

    #[test]
    fn operations_tab_edits_matrix_b_and_composes() {
        let mut a = app();
        press(&mut a, KeyCode::Char('2'));
        assert_eq!(a.tab, Tab::Operations);
        press(&mut a, KeyCode::Enter);
        type_text(&mut a, "3");
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.scene.matrix_b_2d.0[0][0], 3.0);
        press(&mut a, KeyCode::Char('x'));
        assert_eq!(a.scene.matrix_2d.0[0][0], 3.0);
    }

    #[test]
    fn mode_switch_clamps_focus_and_resizes_fields() {
        let mut a = app();
        // Park focus on the last 2D field.
        for _ in 0..6 {
            press(&mut a, KeyCode::Down);
        }
        press(&mut a, KeyCode::Char('m'));
        assert_eq!(a.scene.mode, Mode::ThreeD);
        assert!(a.focused().is_some());
        assert_eq!(a.field_rows().len(), 6); // 3 matrix rows + 3 vectors
    }

    #[test]
    fn preset_cycling_applies_and_reports() {
        let mut a = app();
        press(&mut a, KeyCode::Char('p'));
        assert_eq!(a.scene.matrix_2d, Mat2([[0.0, -1.0], [1.0, 0.0]]));
        assert_eq!(a.status.as_deref(), Some("preset: Rotate 90°"));
    }

    #[test]
    fn reset_is_scoped_to_the_focused_field() {
        let mut a = app();
        a.scene.matrix_2d = Mat2([[5.0, 5.0], [5.0, 5.0]]);
        a.scene.vectors_2d[0].x = 9.0;
        // Focus on a matrix cell: r resets the matrix only.
        press(&mut a, KeyCode::Char('r'));
        assert_eq!(a.scene.matrix_2d, Mat2::identity());
        assert_eq!(a.scene.vectors_2d[0].x, 9.0);
        // Focus on the first vector row: r resets that vector.
        press(&mut a, KeyCode::Down);
        press(&mut a, KeyCode::Down);
        press(&mut a, KeyCode::Char('r'));
        assert_eq!(a.scene.vectors_2d[0].x, 1.0);
    }

    #[test]
    fn reset_all_clears_the_insight_too() {
        let mut a = app();
        a.insight = Some(Insight {
            title: "T".into(),
            explanation: "E".into(),
            math_details: vec![],
        });
        press(&mut a, KeyCode::Char('R'));
        assert!(a.insight.is_none());
        assert_eq!(a.scene.matrix_2d, Mat2::identity());
    }

    #[test]
    fn insight_request_blocked_without_provider() {
        let mut a = app();
        press(&mut a, KeyCode::Char('i'));
        assert!(!a.insight_loading);
        assert!(a.status.is_some());
    }

    #[test]
    fn insight_action_is_disabled_while_loading() {
        let mut a = app();
        a.insight_loading = true;
        press(&mut a, KeyCode::Char('i'));
        // No new channel was created for a second request.
        assert!(a.insight_rx.is_none());
    }

    #[test]
    fn token_popup_opens_and_any_key_closes() {
        let mut a = app();
        press(&mut a, KeyCode::Char('s'));
        assert!(a.token_popup.is_some());
        let token = a.token_popup.clone().unwrap();
        assert!(matrixlab_share::decode(&token).is_ok());
        press(&mut a, KeyCode::Char('z'));
        assert!(a.token_popup.is_none());
    }

    #[test]
    fn orbit_only_applies_in_3d() {
        let mut a = app();
        let yaw0 = a.view.yaw;
        press(&mut a, KeyCode::Char(']'));
        assert_eq!(a.view.yaw, yaw0);
        press(&mut a, KeyCode::Char('m'));
        press(&mut a, KeyCode::Char(']'));
        assert!(a.view.yaw > yaw0);
    }

    #[test]
    fn analysis_tab_has_no_fields() {
        let mut a = app();
        press(&mut a, KeyCode::Char('3'));
        assert!(a.focused().is_none());
        // Enter does not open an editor with nothing focused.
        press(&mut a, KeyCode::Enter);
        assert!(a.edit.is_none());
    }
}
