//! Renderer-independent description of a gauge frame, with SVG export.

use std::fmt;

use super::geometry::{
    self, CENTER, Point, RADIUS, Rgb, SEGMENTS, STROKE_WIDTH, VIEW_BOX_HEIGHT, VIEW_BOX_WIDTH,
};

const VALUE_FONT_SIZE: f64 = 40.0;
const UNIT_FONT_SIZE: f64 = 18.0;
const SCALE_FONT_SIZE: f64 = 10.0;

/// One background band, as SVG path data.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    pub d: String,
    pub color: Rgb,
    pub stroke_width: f64,
}

/// The pointer, as unrotated path data plus a rotation about `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerPath {
    pub d: String,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub center: Point,
    pub color: Rgb,
}

/// A text label anchored at its horizontal center.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Point,
    pub font_size: f64,
    pub color: Rgb,
}

/// The central value readout: a rounded number followed by a smaller "%".
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub value: i64,
    pub position: Point,
    pub font_size: f64,
    pub unit_font_size: f64,
    pub color: Rgb,
}

/// Everything drawn for one displayed value.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeScene {
    pub arcs: Vec<ArcPath>,
    pub pointer: PointerPath,
    pub value_label: ValueLabel,
    pub scale_labels: [TextLabel; 2],
}

impl GaugeScene {
    /// Build the scene for a displayed value. The value is clamped first.
    pub fn new(value: f64) -> Self {
        let value = geometry::clamp_percent(value);

        let arcs = SEGMENTS
            .iter()
            .map(|segment| ArcPath {
                d: geometry::describe_arc(CENTER, RADIUS, segment.start_angle, segment.end_angle),
                color: segment.color,
                stroke_width: STROKE_WIDTH,
            })
            .collect();

        let pointer = PointerPath {
            d: geometry::pointer_path(CENTER),
            rotation: geometry::rotation(value),
            center: CENTER,
            color: Rgb::POINTER,
        };

        let value_label = ValueLabel {
            value: value.round() as i64,
            position: Point::new(CENTER.x, CENTER.y + 12.0),
            font_size: VALUE_FONT_SIZE,
            unit_font_size: UNIT_FONT_SIZE,
            color: Rgb::LABEL,
        };

        let scale_label = |text: &str, x: f64| TextLabel {
            text: text.to_string(),
            position: Point::new(x, 150.0),
            font_size: SCALE_FONT_SIZE,
            color: Rgb::SCALE_LABEL,
        };

        Self {
            arcs,
            pointer,
            value_label,
            scale_labels: [scale_label("0", 30.0), scale_label("100", 170.0)],
        }
    }

    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GaugeScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
            VIEW_BOX_WIDTH, VIEW_BOX_HEIGHT
        )?;

        for arc in &self.arcs {
            writeln!(
                f,
                r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="butt"/>"#,
                arc.d, arc.color, arc.stroke_width
            )?;
        }

        let pointer = &self.pointer;
        writeln!(
            f,
            r#"  <g transform="rotate({}, {}, {})"><path d="{}" fill="{}"/></g>"#,
            pointer.rotation, pointer.center.x, pointer.center.y, pointer.d, pointer.color
        )?;

        let label = &self.value_label;
        writeln!(
            f,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-size="{}" font-weight="600" fill="{}">{}<tspan font-size="{}" dy="-16">%</tspan></text>"#,
            label.position.x,
            label.position.y,
            label.font_size,
            label.color,
            label.value,
            label.unit_font_size
        )?;

        for scale in &self.scale_labels {
            writeln!(
                f,
                r#"  <text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="middle">{}</text>"#,
                scale.position.x, scale.position.y, scale.font_size, scale.color, scale.text
            )?;
        }

        write!(f, "</svg>")
    }
}
