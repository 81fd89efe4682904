//! Monthly visit frequency bar chart using Iced canvas.

use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::{Element, Length, Point, Rectangle, Renderer, Size, Theme};

use mokisight_common::MonthlyVisit;

use super::formatting::format_month_label;
use super::theme;
use crate::message::Message;

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Axis label, e.g. "Sep".
    pub label: String,
    pub value: u32,
}

/// State for the visit frequency chart.
#[derive(Debug)]
pub struct VisitChartState {
    bars: Vec<Bar>,
    title: String,
    cache: Cache,
}

impl VisitChartState {
    /// Create a chart from monthly visits in chronological order.
    pub fn new(title: impl Into<String>, visits: &[MonthlyVisit]) -> Self {
        Self {
            bars: bars_from(visits),
            title: title.into(),
            cache: Cache::new(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Top of the value axis: the largest bar rounded up to a multiple of
    /// the grid step, never below one step.
    pub fn axis_max(&self) -> u32 {
        let max = self.bars.iter().map(|b| b.value).max().unwrap_or(0);
        let step = Self::grid_step(max);
        max.div_ceil(step).max(1) * step
    }

    fn grid_step(max: u32) -> u32 {
        match max {
            0..=5 => 1,
            6..=20 => 5,
            21..=50 => 10,
            _ => 10u32.pow(max.ilog10()),
        }
    }

    /// Total visits over all months.
    pub fn total(&self) -> u32 {
        self.bars.iter().map(|b| b.value).sum()
    }

    /// Heading drawn above the bars, with the visit total.
    pub fn heading(&self) -> String {
        format!("{} ({} visits)", self.title, self.total())
    }
}

fn bars_from(visits: &[MonthlyVisit]) -> Vec<Bar> {
    visits
        .iter()
        .map(|visit| Bar {
            label: format_month_label(&visit.month),
            value: visit.count,
        })
        .collect()
}

/// Chart widget that renders the bars.
pub struct VisitChart<'a> {
    state: &'a VisitChartState,
}

impl<'a> VisitChart<'a> {
    /// Create a new chart widget.
    pub fn new(state: &'a VisitChartState) -> Self {
        Self { state }
    }
}

impl<'a> canvas::Program<Message> for VisitChart<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.state.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_chart(frame, bounds.size(), theme);
        });

        vec![geometry]
    }
}

impl<'a> VisitChart<'a> {
    /// Draw the chart onto the frame.
    fn draw_chart(&self, frame: &mut Frame, size: Size, theme: &Theme) {
        let colors = theme::colors(theme);
        let padding_left = 36.0;
        let padding_top = 30.0;
        let padding_bottom = 24.0;
        let chart_width = size.width - padding_left - 10.0;
        let chart_height = size.height - padding_top - padding_bottom;

        if chart_width <= 0.0 || chart_height <= 0.0 {
            return;
        }

        frame.fill_text(Text {
            content: self.state.heading(),
            position: Point::new(padding_left, 6.0),
            color: colors.text(),
            size: 14.0.into(),
            ..Text::default()
        });

        if self.state.is_empty() {
            frame.fill_text(Text {
                content: "No visits recorded".to_string(),
                position: Point::new(size.width / 2.0 - 60.0, size.height / 2.0),
                color: colors.text_dimmed(),
                size: 14.0.into(),
                ..Text::default()
            });
            return;
        }

        let axis_max = self.state.axis_max();

        // Horizontal grid lines with value labels
        let grid_lines = 4;
        for i in 0..=grid_lines {
            let y = padding_top + (i as f32 / grid_lines as f32) * chart_height;
            let value = axis_max as f32 * (1.0 - i as f32 / grid_lines as f32);

            let line = Path::line(
                Point::new(padding_left, y),
                Point::new(padding_left + chart_width, y),
            );
            frame.stroke(
                &line,
                Stroke::default()
                    .with_color(colors.chart_grid())
                    .with_width(1.0),
            );

            frame.fill_text(Text {
                content: format!("{:.0}", value),
                position: Point::new(4.0, y - 6.0),
                color: colors.chart_label(),
                size: 10.0.into(),
                ..Text::default()
            });
        }

        // Bars
        let slot = chart_width / self.state.bars.len() as f32;
        let bar_width = (slot * 0.6).min(40.0);

        for (i, bar) in self.state.bars.iter().enumerate() {
            let height = bar.value as f32 / axis_max as f32 * chart_height;
            let x = padding_left + slot * i as f32 + (slot - bar_width) / 2.0;
            let y = padding_top + chart_height - height;

            if height > 0.0 {
                let rect = Path::rectangle(Point::new(x, y), Size::new(bar_width, height));
                frame.fill(&rect, colors.chart_bar());
            }

            frame.fill_text(Text {
                content: bar.value.to_string(),
                position: Point::new(x + bar_width / 2.0 - 4.0, y - 14.0),
                color: colors.text_muted(),
                size: 10.0.into(),
                ..Text::default()
            });

            frame.fill_text(Text {
                content: bar.label.clone(),
                position: Point::new(x, padding_top + chart_height + 6.0),
                color: colors.chart_label(),
                size: 10.0.into(),
                ..Text::default()
            });
        }
    }
}

/// Create a chart element.
pub fn visit_chart_view(state: &VisitChartState) -> Element<'_, Message> {
    Canvas::new(VisitChart::new(state))
        .width(Length::Fill)
        .height(Length::Fixed(200.0))
        .into()
}
