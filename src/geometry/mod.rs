//! Board geometry: grid-to-pixel mapping, port positions, wire polylines and
//! arc-length math.

mod arc_length;
mod path;
mod ports;

pub use arc_length::{compute_cumulative_distances, interpolate_along_path, sub_path, ArcLengthIndex};
pub use path::{build_pixel_path, MERGE_DISTANCE};
pub use ports::{cp_anchor_cell, cp_physical_side, resolve_port_position};

use serde::{Deserialize, Serialize};

use crate::models::GridCell;

/// Chip footprint width in grid cells. Inputs sit on the left edge, outputs on
/// the right edge.
pub const CHIP_WIDTH_CELLS: i32 = 2;
/// Row of the first CP slot on either board edge.
pub const CP_FIRST_ROW: i32 = 3;
/// Rows between consecutive CP slots on one edge.
pub const CP_ROW_STRIDE: i32 = 6;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Geometry scale and playable area of a board.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardLayout {
    /// Pixel size of one grid cell.
    pub cell_size: f64,
    pub cols: i32,
    pub rows: i32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            cell_size: 24.0,
            cols: 32,
            rows: 18,
        }
    }
}

impl BoardLayout {
    /// Pixel position of the grid intersection at `cell`.
    pub fn cell_point(&self, cell: GridCell) -> Point {
        Point {
            x: f64::from(cell.col) * self.cell_size,
            y: f64::from(cell.row) * self.cell_size,
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn around(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn union(&mut self, other: &Bounds) {
        self.include(other.min);
        self.include(other.max);
    }

    pub fn inflate(&self, by: f64) -> Bounds {
        Bounds {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_points_scale_by_cell_size() {
        let layout = BoardLayout {
            cell_size: 10.0,
            ..BoardLayout::default()
        };
        assert_eq!(layout.cell_point(GridCell::new(3, -2)), Point::new(30.0, -20.0));
    }

    #[test]
    fn bounds_grow_and_inflate() {
        let mut bounds = Bounds::around(Point::new(5.0, 5.0));
        bounds.include(Point::new(-1.0, 8.0));
        let padded = bounds.inflate(2.0);
        assert_eq!(padded.min, Point::new(-3.0, 3.0));
        assert_eq!(padded.max, Point::new(7.0, 10.0));
        assert_eq!(bounds.width(), 6.0);
        assert_eq!(bounds.height(), 3.0);
    }
}
