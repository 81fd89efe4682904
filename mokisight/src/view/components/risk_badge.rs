//! Churn risk badge: a colored dot with the risk level.

use iced::widget::{container, row, text};
use iced::{Alignment, Element, Length, Theme};

use mokisight_common::ChurnRiskLevel;

use crate::view::theme;

/// A churn risk indicator.
pub struct RiskBadge {
    level: ChurnRiskLevel,
    /// Size of the dot (diameter).
    size: f32,
}

impl RiskBadge {
    /// Create a new badge for `level`.
    pub fn new(level: ChurnRiskLevel) -> Self {
        Self { level, size: 12.0 }
    }

    /// Set the dot size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Text shown next to the dot.
    pub fn label(&self) -> String {
        match &self.level {
            ChurnRiskLevel::High => "High risk".to_string(),
            ChurnRiskLevel::Medium => "Medium risk".to_string(),
            ChurnRiskLevel::Low => "Low risk".to_string(),
            ChurnRiskLevel::Other(level) => format!("Risk: {}", level),
        }
    }

    /// Render the badge as an Iced element.
    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        let size = self.size;
        let label = self.label();
        let level = self.level;
        let text_level = level.clone();

        let dot = container(text(""))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .style(move |t: &Theme| container::Style {
                background: Some(iced::Background::Color(theme::colors(t).churn_risk(&level))),
                border: iced::Border {
                    color: theme::colors(t).border(),
                    width: 1.0,
                    radius: (size / 2.0).into(),
                },
                ..Default::default()
            });

        let label = text(label).size(12).style(move |t: &Theme| text::Style {
            color: Some(theme::colors(t).churn_risk(&text_level)),
        });

        row![dot, label].spacing(8).align_y(Alignment::Center).into()
    }
}
