use super::Point;

/// Running path length at every vertex; starts at 0 and never decreases.
pub fn compute_cumulative_distances(points: &[Point]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += points[i - 1].distance(point);
        }
        distances.push(total);
    }
    distances
}

/// Point at `target_distance` along the polyline, clamped to its ends.
///
/// `distances` must come from [`compute_cumulative_distances`] for the same
/// points. Empty input yields the origin and a NaN target the first point.
pub fn interpolate_along_path(points: &[Point], distances: &[f64], target_distance: f64) -> Point {
    let len = points.len().min(distances.len());
    if len == 0 {
        return Point::ORIGIN;
    }
    if target_distance.is_nan() || target_distance <= 0.0 {
        return points[0];
    }
    if target_distance >= distances[len - 1] {
        return points[len - 1];
    }

    // First vertex strictly past the target; distances[0] == 0 keeps it >= 1.
    let hi = distances[..len].partition_point(|&d| d <= target_distance);
    let lo = hi - 1;
    let span = distances[hi] - distances[lo];
    if span <= 0.0 {
        return points[lo];
    }
    let t = (target_distance - distances[lo]) / span;
    points[lo].lerp(&points[hi], t)
}

/// Portion of the polyline between two distances, keeping interior corners.
pub fn sub_path(points: &[Point], distances: &[f64], from: f64, to: f64) -> Vec<Point> {
    let mut out = vec![interpolate_along_path(points, distances, from)];
    out.extend(
        points
            .iter()
            .zip(distances)
            .filter(|(_, &d)| d > from && d < to)
            .map(|(p, _)| *p),
    );
    out.push(interpolate_along_path(points, distances, to));
    out
}

/// Polyline with its cumulative distance table, built once per wire per frame.
#[derive(Clone, Debug, Default)]
pub struct ArcLengthIndex {
    pub points: Vec<Point>,
    pub distances: Vec<f64>,
}

impl ArcLengthIndex {
    pub fn new(points: Vec<Point>) -> Self {
        let distances = compute_cumulative_distances(&points);
        Self { points, distances }
    }

    pub fn total_length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    pub fn point_at(&self, distance: f64) -> Point {
        interpolate_along_path(&self.points, &self.distances, distance)
    }

    pub fn slice(&self, from: f64, to: f64) -> Vec<Point> {
        sub_path(&self.points, &self.distances, from, to)
    }
}
