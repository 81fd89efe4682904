//! Animated churn-rate gauge drawn on an Iced canvas.

use std::time::Instant;

use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Theme};

use crate::gauge::geometry::{
    self, CENTER, RADIUS, SEGMENTS, STROKE_WIDTH, VIEW_BOX_HEIGHT, VIEW_BOX_WIDTH,
};
use crate::gauge::{FrameOutcome, GaugeAnimation, RunHandle};
use crate::message::Message;
use crate::view::theme;

/// Line segments per background band.
const ARC_STEPS: usize = 48;

/// Rough glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.6;

/// Gauge state owned by the view: the animation plus its geometry cache.
#[derive(Debug)]
pub struct GaugeView {
    animation: GaugeAnimation,
    cache: Cache,
    /// Timestamp of the newest frame delivered so far.
    latest_frame: Option<Instant>,
    /// Frames at or before this instant belong to an earlier run.
    run_cutoff: Option<Instant>,
}

impl Default for GaugeView {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeView {
    /// An idle gauge showing 0.
    pub fn new() -> Self {
        Self {
            animation: GaugeAnimation::new(),
            cache: Cache::new(),
            latest_frame: None,
            run_cutoff: None,
        }
    }

    /// Animate towards `target` unless it is the value already shown.
    pub fn set_target(&mut self, target: f64) -> Option<RunHandle> {
        let handle = self.animation.set_target(target);
        if handle.is_some() {
            self.run_cutoff = self.latest_frame;
            self.cache.clear();
        }
        handle
    }

    /// Advance the running animation to the frame time `now`.
    ///
    /// Frames carry no run handle, so a frame timestamped no later than the
    /// last frame seen before the current run started is treated as stale.
    pub fn on_frame(&mut self, now: Instant) -> FrameOutcome {
        if self.latest_frame.is_none_or(|latest| now > latest) {
            self.latest_frame = Some(now);
        }

        let Some(handle) = self.animation.current_run() else {
            return FrameOutcome::Stale;
        };

        if self.run_cutoff.is_some_and(|cutoff| now <= cutoff) {
            tracing::debug!("Dropping gauge frame from before the restart");
            return FrameOutcome::Stale;
        }

        let outcome = self.animation.on_frame(handle, now);
        if outcome != FrameOutcome::Stale {
            self.cache.clear();
        }
        outcome
    }

    /// Tear down: stop the animation and forget the target.
    pub fn reset(&mut self) {
        self.animation.reset();
        self.cache.clear();
    }

    /// Whether display frames are wanted.
    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    /// Currently displayed value.
    pub fn value(&self) -> f64 {
        self.animation.value()
    }

    /// Clamped target of the latest run.
    pub fn target(&self) -> f64 {
        self.animation.target()
    }

    /// Access the underlying animation.
    pub fn animation(&self) -> &GaugeAnimation {
        &self.animation
    }

    /// Render the gauge.
    pub fn view(&self, width: f32) -> Element<'_, Message> {
        let height = width * (VIEW_BOX_HEIGHT / VIEW_BOX_WIDTH) as f32;
        Canvas::new(GaugeCanvas { gauge: self })
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .into()
    }
}

/// Canvas program drawing one [`GaugeView`].
struct GaugeCanvas<'a> {
    gauge: &'a GaugeView,
}

/// Maps view-box coordinates into the canvas bounds, keeping aspect ratio.
#[derive(Debug, Clone, Copy)]
struct ViewBox {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl ViewBox {
    fn fit(bounds: Rectangle) -> Self {
        let scale = (bounds.width / VIEW_BOX_WIDTH as f32).min(bounds.height / VIEW_BOX_HEIGHT as f32);
        Self {
            scale,
            offset_x: (bounds.width - VIEW_BOX_WIDTH as f32 * scale) / 2.0,
            offset_y: (bounds.height - VIEW_BOX_HEIGHT as f32 * scale) / 2.0,
        }
    }

    fn point(&self, p: geometry::Point) -> Point {
        Point::new(
            self.offset_x + p.x as f32 * self.scale,
            self.offset_y + p.y as f32 * self.scale,
        )
    }

    fn size(&self, units: f64) -> f32 {
        units as f32 * self.scale
    }
}

impl canvas::Program<Message> for GaugeCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.gauge.cache.draw(renderer, bounds.size(), |frame| {
            draw_gauge(frame, ViewBox::fit(bounds), self.gauge.animation(), theme);
        });

        vec![geometry]
    }
}

fn draw_gauge(frame: &mut Frame, view_box: ViewBox, animation: &GaugeAnimation, theme: &Theme) {
    let colors = theme::colors(theme);

    // Background bands
    for segment in &SEGMENTS {
        let points = geometry::arc_points(
            CENTER,
            RADIUS,
            segment.start_angle,
            segment.end_angle,
            ARC_STEPS,
        );
        let path = Path::new(|builder| {
            let mut points = points.iter().map(|p| view_box.point(*p));
            if let Some(first) = points.next() {
                builder.move_to(first);
                for point in points {
                    builder.line_to(point);
                }
            }
        });
        frame.stroke(
            &path,
            Stroke::default()
                .with_color(theme::rgb(segment.color))
                .with_width(view_box.size(STROKE_WIDTH)),
        );
    }

    // Pointer
    let [tip, left, right] = geometry::rotated_pointer(CENTER, animation.rotation());
    let pointer = Path::new(|builder| {
        builder.move_to(view_box.point(tip));
        builder.line_to(view_box.point(left));
        builder.line_to(view_box.point(right));
        builder.close();
    });
    frame.fill(&pointer, colors.gauge_pointer());

    // Value readout: number plus a smaller raised "%", centered as a pair
    let number = animation.label().to_string();
    let number_size = view_box.size(40.0);
    let unit_size = view_box.size(18.0);
    let number_width = number.len() as f32 * number_size * GLYPH_WIDTH;
    let total_width = number_width + unit_size * GLYPH_WIDTH;

    let baseline = view_box.point(geometry::Point::new(CENTER.x, CENTER.y + 12.0));
    let left_x = baseline.x - total_width / 2.0;
    let label_color = colors.gauge_label();

    frame.fill_text(Text {
        content: number,
        position: Point::new(left_x, baseline.y - number_size * 0.8),
        color: label_color,
        size: number_size.into(),
        ..Text::default()
    });
    frame.fill_text(Text {
        content: "%".to_string(),
        position: Point::new(
            left_x + number_width,
            baseline.y - view_box.size(16.0) - unit_size * 0.8,
        ),
        color: label_color,
        size: unit_size.into(),
        ..Text::default()
    });

    // Scale end labels
    let scale_size = view_box.size(10.0);
    for (label, x) in [("0", 30.0), ("100", 170.0)] {
        let anchor = view_box.point(geometry::Point::new(x, 150.0));
        frame.fill_text(Text {
            content: label.to_string(),
            position: Point::new(
                anchor.x - label.len() as f32 * scale_size * GLYPH_WIDTH / 2.0,
                anchor.y - scale_size * 0.8,
            ),
            color: scale_label_color(&colors),
            size: scale_size.into(),
            ..Text::default()
        });
    }
}

fn scale_label_color(colors: &theme::ThemeColors<'_>) -> Color {
    if colors.is_dark() {
        colors.text_muted()
    } else {
        theme::rgb(geometry::Rgb::SCALE_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_view_box_fit_keeps_aspect() {
        let fit = ViewBox::fit(Rectangle::new(Point::ORIGIN, iced::Size::new(400.0, 400.0)));
        assert_eq!(fit.scale, 2.0);
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, 40.0);

        let center = fit.point(CENTER);
        assert_eq!(center, Point::new(200.0, 240.0));
    }

    #[test]
    fn test_gauge_view_runs_to_target() {
        let mut gauge = GaugeView::new();
        assert!(gauge.set_target(45.0).is_some());
        assert!(gauge.is_running());

        let start = Instant::now();
        assert_eq!(gauge.on_frame(start), FrameOutcome::Continue);
        assert_eq!(gauge.value(), 0.0);
        assert_eq!(
            gauge.on_frame(start + Duration::from_millis(2000)),
            FrameOutcome::Finished
        );
        assert_eq!(gauge.value(), 45.0);
        assert!(!gauge.is_running());
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut gauge = GaugeView::new();
        gauge.set_target(30.0);
        let start = Instant::now();
        gauge.on_frame(start);
        gauge.on_frame(start + Duration::from_millis(2500));

        assert!(gauge.set_target(30.0).is_none());
        assert_eq!(gauge.value(), 30.0);
    }

    #[test]
    fn test_reset_stops_frames() {
        let mut gauge = GaugeView::new();
        gauge.set_target(70.0);
        gauge.reset();
        assert!(!gauge.is_running());
        assert_eq!(gauge.on_frame(Instant::now()), FrameOutcome::Stale);
        assert_eq!(gauge.value(), 0.0);

        // A torn-down gauge animates again even for the same target.
        assert!(gauge.set_target(70.0).is_some());
    }

    #[test]
    fn test_restart_drops_frames_of_previous_run() {
        let mut gauge = GaugeView::new();
        gauge.set_target(30.0);
        let start = Instant::now();
        gauge.on_frame(start);
        let queued = start + Duration::from_millis(500);
        gauge.on_frame(queued);
        assert!(gauge.value() > 0.0);

        // Retarget while a frame stamped before the restart is still queued.
        assert!(gauge.set_target(80.0).is_some());
        assert_eq!(gauge.on_frame(queued), FrameOutcome::Stale);
        assert_eq!(gauge.on_frame(start + Duration::from_millis(100)), FrameOutcome::Stale);
        assert_eq!(gauge.value(), 0.0);

        // The first newer frame starts the new run at 0.
        let restart = start + Duration::from_millis(516);
        assert_eq!(gauge.on_frame(restart), FrameOutcome::Continue);
        assert_eq!(gauge.value(), 0.0);
        assert_eq!(
            gauge.on_frame(restart + Duration::from_millis(800)),
            FrameOutcome::Continue
        );
        assert_eq!(gauge.value(), 100.0);
        assert_eq!(
            gauge.on_frame(restart + Duration::from_millis(2000)),
            FrameOutcome::Finished
        );
        assert_eq!(gauge.value(), 80.0);
    }
}
