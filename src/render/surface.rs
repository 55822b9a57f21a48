//! Minimal 2D stroke surface the renderer draws onto.
//!
//! Method names follow the browser canvas context so a `web_sys` canvas
//! adapter is a one-line forward per method.

use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

pub trait DrawSurface {
    fn save(&mut self);
    fn restore(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);

    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_shadow_color(&mut self, color: &str);
    fn set_shadow_blur(&mut self, blur: f64);
}

/// Strokes an open polyline with whatever style is current.
pub fn stroke_polyline<S: DrawSurface + ?Sized>(surface: &mut S, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    surface.begin_path();
    surface.move_to(first.x, first.y);
    for p in rest {
        surface.line_to(p.x, p.y);
    }
    surface.stroke();
}

/// Style state as seen by a stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeState {
    pub stroke_style: String,
    pub line_width: f64,
    pub global_alpha: f64,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
    pub shadow_color: String,
    pub shadow_blur: f64,
}

impl Default for StrokeState {
    fn default() -> Self {
        Self {
            stroke_style: "#000000".into(),
            line_width: 1.0,
            global_alpha: 1.0,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            shadow_color: "rgba(0, 0, 0, 0)".into(),
            shadow_blur: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeRecord {
    pub points: Vec<Point>,
    pub state: StrokeState,
}

/// Surface that keeps every stroke with the style it was drawn with.
///
/// Used headless (benchmarks, snapshot tests) and to check that save/restore
/// stays balanced.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub strokes: Vec<StrokeRecord>,
    state: StrokeState,
    stack: Vec<StrokeState>,
    path: Vec<Point>,
    max_depth: usize,
    unmatched_restores: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current save depth; 0 once every save has been restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn unmatched_restores(&self) -> usize {
        self.unmatched_restores
    }

    /// State outside of any save/restore bracket.
    pub fn current_state(&self) -> &StrokeState {
        &self.state
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl DrawSurface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => self.unmatched_restores += 1,
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(Point::new(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push(Point::new(x, y));
    }

    fn stroke(&mut self) {
        self.strokes.push(StrokeRecord {
            points: self.path.clone(),
            state: self.state.clone(),
        });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke_style = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.global_alpha = alpha;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_shadow_color(&mut self, color: &str) {
        self.state.shadow_color = color.to_string();
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.state.shadow_blur = blur;
    }
}
