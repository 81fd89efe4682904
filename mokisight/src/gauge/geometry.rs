//! Arc geometry of the churn gauge.
//!
//! Coordinates live in a 200x160 box with y pointing down. Angles are in
//! degrees, 0 pointing at 12 o'clock and growing clockwise; the gauge sweeps
//! from -135 (0%) to +135 (100%).

use std::fmt;

pub const VIEW_BOX_WIDTH: f64 = 200.0;
pub const VIEW_BOX_HEIGHT: f64 = 160.0;

pub const CENTER: Point = Point { x: 100.0, y: 100.0 };
pub const RADIUS: f64 = 80.0;
pub const STROKE_WIDTH: f64 = 12.0;

/// Angle of the 0% end of the scale.
pub const MIN_ANGLE: f64 = -135.0;
/// Total angular sweep of the scale.
pub const SWEEP: f64 = 270.0;

/// Distance from the center to the pointer tip (just inside the arc).
const POINTER_TIP: f64 = 68.0;
/// Distance from the center to the pointer base.
const POINTER_BASE: f64 = 60.0;
const POINTER_HALF_WIDTH: f64 = 3.0;

/// A point in gauge coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[cfg(test)]
    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0x34, 0xD3, 0x99);
    pub const AMBER: Rgb = Rgb(0xFB, 0xBF, 0x24);
    pub const RED: Rgb = Rgb(0xF8, 0x71, 0x71);
    pub const POINTER: Rgb = Rgb(0x37, 0x41, 0x51);
    pub const LABEL: Rgb = Rgb(0x1F, 0x29, 0x37);
    pub const SCALE_LABEL: Rgb = Rgb(0x9C, 0xA3, 0xAF);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A colored background band of the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Rgb,
}

/// Background bands: safe, warning, risk. 2 degree gaps separate them.
pub const SEGMENTS: [ArcSegment; 3] = [
    ArcSegment {
        start_angle: -135.0,
        end_angle: -112.0,
        color: Rgb::GREEN,
    },
    ArcSegment {
        start_angle: -110.0,
        end_angle: -55.0,
        color: Rgb::AMBER,
    },
    ArcSegment {
        start_angle: -53.0,
        end_angle: 135.0,
        color: Rgb::RED,
    },
];

/// Normalize a percentage into [0, 100]. `NaN` becomes 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Angle on the scale for a percentage.
pub fn value_to_angle(value: f64) -> f64 {
    clamp_percent(value) / 100.0 * SWEEP + MIN_ANGLE
}

/// Pointer rotation in degrees for the displayed value.
pub fn rotation(value: f64) -> f64 {
    value_to_angle(value)
}

/// Percentage at which an angle sits on the scale.
#[cfg(test)]
pub fn angle_to_value(angle: f64) -> f64 {
    (angle - MIN_ANGLE) / SWEEP * 100.0
}

/// Point at `radius` from `center` in the direction of `angle`.
pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
    let radians = (angle - 90.0).to_radians();
    Point {
        x: center.x + radius * radians.cos(),
        y: center.y + radius * radians.sin(),
    }
}

/// SVG large-arc flag for a span: 0 up to and including 180 degrees.
pub fn large_arc_flag(start_angle: f64, end_angle: f64) -> u8 {
    if end_angle - start_angle <= 180.0 { 0 } else { 1 }
}

/// SVG path data for an arc between two angles.
///
/// The path starts at the end angle and sweeps back to the start angle
/// (sweep flag 0).
pub fn describe_arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let start = polar_to_cartesian(center, radius, end_angle);
    let end = polar_to_cartesian(center, radius, start_angle);
    let large_arc = large_arc_flag(start_angle, end_angle);

    format!(
        "M {} {} A {} {} 0 {} 0 {} {}",
        start.x, start.y, radius, radius, large_arc, end.x, end.y
    )
}

/// Polyline approximation of an arc, from `start_angle` to `end_angle`.
///
/// Returns `steps + 1` points; `steps` of 0 is treated as 1.
pub fn arc_points(center: Point, radius: f64, start_angle: f64, end_angle: f64, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            polar_to_cartesian(center, radius, start_angle + (end_angle - start_angle) * t)
        })
        .collect()
}

/// Rotate `point` clockwise about `center` by `degrees`.
pub fn rotate_about(point: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point {
        x: center.x + dx * cos - dy * sin,
        y: center.y + dx * sin + dy * cos,
    }
}

/// Pointer triangle in its rest position (pointing at 12 o'clock):
/// tip, left base corner, right base corner.
pub fn pointer_points(center: Point) -> [Point; 3] {
    [
        Point::new(center.x, center.y - POINTER_TIP),
        Point::new(center.x - POINTER_HALF_WIDTH, center.y - POINTER_BASE),
        Point::new(center.x + POINTER_HALF_WIDTH, center.y - POINTER_BASE),
    ]
}

/// Pointer triangle rotated to `degrees`.
pub fn rotated_pointer(center: Point, degrees: f64) -> [Point; 3] {
    pointer_points(center).map(|p| rotate_about(p, center, degrees))
}

/// SVG path data of the unrotated pointer.
pub fn pointer_path(center: Point) -> String {
    let [tip, left, right] = pointer_points(center);
    format!(
        "M {} {} L {} {} L {} {} Z",
        tip.x, tip.y, left.x, left.y, right.x, right.y
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-20.0), 0.0);
        assert_eq!(clamp_percent(0.0), 0.0);
        assert_eq!(clamp_percent(37.5), 37.5);
        assert_eq!(clamp_percent(100.0), 100.0);
        assert_eq!(clamp_percent(150.0), 100.0);
        assert_eq!(clamp_percent(f64::INFINITY), 100.0);
        assert_eq!(clamp_percent(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_nan_is_treated_as_zero() {
        assert_eq!(clamp_percent(f64::NAN), 0.0);
        assert_eq!(rotation(f64::NAN), -135.0);
    }

    #[test]
    fn test_rotation_endpoints_and_monotonicity() {
        assert_eq!(rotation(0.0), -135.0);
        assert_eq!(rotation(100.0), 135.0);
        assert_close(rotation(45.0), -13.5);
        assert_close(rotation(50.0), 0.0);

        let mut previous = rotation(0.0);
        for i in 1..=1000 {
            let current = rotation(i as f64 / 10.0);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_angle_value_inverse() {
        for value in [0.0, 8.5, 30.0, 45.0, 100.0] {
            assert_close(angle_to_value(value_to_angle(value)), value);
        }
    }

    #[test]
    fn test_polar_to_cartesian_directions() {
        let up = polar_to_cartesian(CENTER, RADIUS, 0.0);
        assert_close(up.x, 100.0);
        assert_close(up.y, 20.0);

        let right = polar_to_cartesian(CENTER, RADIUS, 90.0);
        assert_close(right.x, 180.0);
        assert_close(right.y, 100.0);

        let bottom_left = polar_to_cartesian(CENTER, RADIUS, -135.0);
        assert!(bottom_left.x < CENTER.x && bottom_left.y > CENTER.y);
        assert_close(bottom_left.distance(CENTER), RADIUS);
    }

    #[test]
    fn test_large_arc_flag_boundary() {
        assert_eq!(large_arc_flag(0.0, 179.0), 0);
        assert_eq!(large_arc_flag(-90.0, 90.0), 0);
        assert_eq!(large_arc_flag(0.0, 180.0), 0);
        assert_eq!(large_arc_flag(0.0, 180.5), 1);
        assert_eq!(large_arc_flag(-135.0, 135.0), 1);
    }

    #[test]
    fn test_describe_arc_starts_at_end_angle() {
        let d = describe_arc(CENTER, RADIUS, -90.0, 90.0);
        let parts: Vec<&str> = d.split(' ').collect();
        assert_eq!(parts.len(), 11);
        assert_eq!(&parts[3..9], &["A", "80", "80", "0", "0", "0"]);
        let coords: Vec<f64> = [parts[1], parts[2], parts[9], parts[10]]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_close(coords[0], 180.0);
        assert_close(coords[1], 100.0);
        assert_close(coords[2], 20.0);
        assert_close(coords[3], 100.0);

        let red = describe_arc(CENTER, RADIUS, -53.0, 135.0);
        let parts: Vec<&str> = red.split(' ').collect();
        assert_eq!(parts[0], "M");
        assert_eq!(parts[3], "A");
        // 188 degree span uses the large arc
        assert_eq!(parts[7], "1");
        assert_eq!(parts[8], "0");

        let start_x: f64 = parts[1].parse().unwrap();
        let expected = polar_to_cartesian(CENTER, RADIUS, 135.0);
        assert_close(start_x, expected.x);
    }

    #[test]
    fn test_segments_partition_the_sweep() {
        assert_eq!(SEGMENTS[0].start_angle, MIN_ANGLE);
        assert_eq!(SEGMENTS[2].end_angle, MIN_ANGLE + SWEEP);
        for pair in SEGMENTS.windows(2) {
            assert!(pair[0].end_angle < pair[1].start_angle);
        }
        assert!(angle_to_value(SEGMENTS[0].end_angle) < 9.0);
        assert!(angle_to_value(SEGMENTS[1].end_angle) < 30.0);
        assert!(angle_to_value(SEGMENTS[2].start_angle) > 30.0);
    }

    #[test]
    fn test_arc_points_follow_radius() {
        let points = arc_points(CENTER, RADIUS, -135.0, 135.0, 27);
        assert_eq!(points.len(), 28);
        for p in &points {
            assert!((p.distance(CENTER) - RADIUS).abs() < EPS * 1000.0);
        }
        assert_eq!(points[0], polar_to_cartesian(CENTER, RADIUS, -135.0));
        assert_eq!(arc_points(CENTER, RADIUS, 0.0, 10.0, 0).len(), 2);
    }

    #[test]
    fn test_pointer_shape() {
        assert_eq!(pointer_path(CENTER), "M 100 32 L 97 40 L 103 40 Z");
    }

    #[test]
    fn test_rotated_pointer_tip_tracks_value() {
        let [tip, _, _] = rotated_pointer(CENTER, rotation(45.0));
        let expected = polar_to_cartesian(CENTER, 68.0, -13.5);
        assert_close(tip.x, expected.x);
        assert_close(tip.y, expected.y);

        let [tip, _, _] = rotated_pointer(CENTER, 90.0);
        assert_close(tip.x, 168.0);
        assert_close(tip.y, 100.0);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb::GREEN.to_string(), "#34D399");
        assert_eq!(Rgb::POINTER.to_string(), "#374151");
    }
}
