//! Theme-aware color palette for MokiSight.
//!
//! Semantic colors that adapt to the current theme. Use these instead of
//! hardcoded `Color::from_rgb()` values in views.

use iced::{Color, Theme};

use mokisight_common::ChurnRiskLevel;

use crate::gauge::geometry::Rgb;

/// Colors derived from the theme's extended palette.
pub struct ThemeColors<'a> {
    theme: &'a Theme,
}

impl<'a> ThemeColors<'a> {
    /// Create a new ThemeColors from a theme reference.
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn palette(&self) -> &iced::theme::palette::Extended {
        self.theme.extended_palette()
    }

    // ========================================================================
    // Text Colors
    // ========================================================================

    /// Primary text color.
    pub fn text(&self) -> Color {
        self.palette().background.base.text
    }

    /// Muted/secondary text color.
    pub fn text_muted(&self) -> Color {
        self.palette().background.weak.text
    }

    /// Dimmed text (captions, placeholders).
    pub fn text_dimmed(&self) -> Color {
        let text = self.text();
        let bg = self.palette().background.base.color;
        Color::from_rgb(
            text.r * 0.5 + bg.r * 0.5,
            text.g * 0.5 + bg.g * 0.5,
            text.b * 0.5 + bg.b * 0.5,
        )
    }

    // ========================================================================
    // Semantic Colors
    // ========================================================================

    /// Positive change (green).
    pub fn success(&self) -> Color {
        self.palette().success.base.color
    }

    /// Negative change and errors (red).
    pub fn danger(&self) -> Color {
        self.palette().danger.base.color
    }

    /// Warning color (amber).
    pub fn warning(&self) -> Color {
        self.shade(rgb(Rgb::AMBER), Color::from_rgb8(0xD9, 0x77, 0x06))
    }

    /// Color for a signed change: green when up, red when down.
    pub fn change(&self, delta: f64) -> Color {
        if delta > 0.0 {
            self.success()
        } else if delta < 0.0 {
            self.danger()
        } else {
            self.text_muted()
        }
    }

    // ========================================================================
    // Borders and Surfaces
    // ========================================================================

    pub fn border(&self) -> Color {
        self.shade(Color::from_rgb8(0x37, 0x41, 0x51), Color::from_rgb8(0xD1, 0xD5, 0xDB))
    }

    /// Dashboard card fill.
    pub fn card_background(&self) -> Color {
        self.shade(Color::from_rgb8(0x1F, 0x29, 0x37), Color::WHITE)
    }

    /// Customer row fill.
    pub fn row_background(&self) -> Color {
        self.shade(Color::from_rgb8(0x18, 0x20, 0x2C), Color::from_rgb8(0xF9, 0xFA, 0xFB))
    }

    pub fn table_header(&self) -> Color {
        self.shade(Color::from_rgb8(0x11, 0x18, 0x27), Color::from_rgb8(0xF3, 0xF4, 0xF6))
    }

    // ========================================================================
    // Visit Chart
    // ========================================================================

    pub fn chart_grid(&self) -> Color {
        self.shade(Color::from_rgb8(0x37, 0x41, 0x51), Color::from_rgb8(0xE5, 0xE7, 0xEB))
    }

    /// Month labels and axis values.
    pub fn chart_label(&self) -> Color {
        self.shade(rgb(Rgb::SCALE_LABEL), Color::from_rgb8(0x6B, 0x72, 0x80))
    }

    /// Bar fill; matches the low-risk gauge band.
    pub fn chart_bar(&self) -> Color {
        self.shade(rgb(Rgb::GREEN), Color::from_rgb8(0x05, 0x96, 0x69))
    }

    // ========================================================================
    // Gauge Colors
    // ========================================================================

    /// Gauge pointer. Darkened palette colors vanish on dark backgrounds.
    pub fn gauge_pointer(&self) -> Color {
        self.shade(Color::from_rgb8(0xE5, 0xE7, 0xEB), rgb(Rgb::POINTER))
    }

    /// Gauge value readout.
    pub fn gauge_label(&self) -> Color {
        if self.is_dark() {
            self.text()
        } else {
            rgb(Rgb::LABEL)
        }
    }

    // ========================================================================
    // Churn Risk Colors
    // ========================================================================

    /// Badge color for a churn risk level.
    pub fn churn_risk(&self, level: &ChurnRiskLevel) -> Color {
        match level {
            ChurnRiskLevel::High => rgb(Rgb::RED),
            ChurnRiskLevel::Medium => rgb(Rgb::AMBER),
            ChurnRiskLevel::Low => rgb(Rgb::GREEN),
            ChurnRiskLevel::Other(_) => rgb(Rgb::SCALE_LABEL),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.palette().is_dark
    }

    fn shade(&self, dark: Color, light: Color) -> Color {
        if self.is_dark() { dark } else { light }
    }
}

/// Convert a gauge palette entry into an iced color.
pub fn rgb(color: Rgb) -> Color {
    Color::from_rgb8(color.0, color.1, color.2)
}

/// Convenience function to create ThemeColors.
pub fn colors(theme: &Theme) -> ThemeColors<'_> {
    ThemeColors::new(theme)
}
