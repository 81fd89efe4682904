//! Horizontal bar for 0-100 scores such as loyalty.

use iced::widget::{Column, container, row, text};
use iced::{Alignment, Element, Length, Theme};

use crate::view::theme;

/// Style configuration for a score bar.
#[derive(Debug, Clone, Copy)]
pub struct ScoreBarStyle {
    /// Scores at or above this are shown as strong (0 - 100).
    pub strong_threshold: u32,
    /// Scores below this are shown as weak (0 - 100).
    pub weak_threshold: u32,
    /// Height of the bar.
    pub height: f32,
}

impl Default for ScoreBarStyle {
    fn default() -> Self {
        Self {
            strong_threshold: 70,
            weak_threshold: 40,
            height: 12.0,
        }
    }
}

/// Band a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

/// A score bar with a label and the numeric score.
pub struct ScoreBar {
    /// Score, clamped to 0 - 100.
    score: u32,
    label: String,
    style: ScoreBarStyle,
}

impl ScoreBar {
    /// Create a new score bar.
    pub fn new(score: u32, label: impl Into<String>) -> Self {
        Self {
            score: score.min(100),
            label: label.into(),
            style: ScoreBarStyle::default(),
        }
    }

    /// Set custom thresholds.
    pub fn with_thresholds(mut self, strong: u32, weak: u32) -> Self {
        self.style.strong_threshold = strong;
        self.style.weak_threshold = weak;
        self
    }

    /// Set custom height.
    pub fn with_height(mut self, height: f32) -> Self {
        self.style.height = height;
        self
    }

    /// Band of the current score.
    pub fn band(&self) -> ScoreBand {
        if self.score >= self.style.strong_threshold {
            ScoreBand::Strong
        } else if self.score >= self.style.weak_threshold {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }

    /// Render the score bar as an Iced element.
    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        let band = self.band();
        let filled = self.score as u16;
        let height = self.style.height;

        let label_row = row![
            text(self.label).size(13),
            text(format!("{} / 100", self.score)).size(12),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let filled_bar = container(text(""))
            .width(Length::FillPortion(filled))
            .height(Length::Fixed(height))
            .style(move |t: &Theme| {
                let colors = theme::colors(t);
                let color = match band {
                    ScoreBand::Strong => colors.success(),
                    ScoreBand::Moderate => colors.warning(),
                    ScoreBand::Weak => colors.danger(),
                };
                container::Style {
                    background: Some(iced::Background::Color(color)),
                    ..Default::default()
                }
            });

        let empty_bar = container(text(""))
            .width(Length::FillPortion(100 - filled))
            .height(Length::Fixed(height))
            .style(|t: &Theme| container::Style {
                background: Some(iced::Background::Color(theme::colors(t).row_background())),
                ..Default::default()
            });

        // FillPortion(0) still takes space, so drop empty halves entirely
        let mut bar_row = row![].width(Length::Fill);
        if filled > 0 {
            bar_row = bar_row.push(filled_bar);
        }
        if filled < 100 {
            bar_row = bar_row.push(empty_bar);
        }

        let bar = container(bar_row)
            .width(Length::Fill)
            .style(|t: &Theme| container::Style {
                border: iced::Border {
                    color: theme::colors(t).border(),
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            });

        Column::new()
            .push(label_row)
            .push(bar)
            .spacing(4)
            .width(Length::Fill)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(ScoreBar::new(140, "Loyalty").score, 100);
    }

    #[test]
    fn test_bands() {
        assert_eq!(ScoreBar::new(85, "").band(), ScoreBand::Strong);
        assert_eq!(ScoreBar::new(70, "").band(), ScoreBand::Strong);
        assert_eq!(ScoreBar::new(55, "").band(), ScoreBand::Moderate);
        assert_eq!(ScoreBar::new(10, "").band(), ScoreBand::Weak);
        assert_eq!(
            ScoreBar::new(55, "").with_thresholds(50, 20).band(),
            ScoreBand::Strong
        );
    }
}
