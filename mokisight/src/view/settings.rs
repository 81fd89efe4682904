//! Settings screen: backend address and theme.

use iced::widget::{Column, button, column, container, pick_list, row, rule, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Theme};

use mokisight_common::{AppConfig, validate_base_url};

use crate::app::AppTheme;
use crate::message::Message;
use crate::view::theme;

/// Editable copy of the settings shown on the settings screen.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// Backend API base URL.
    pub base_url: String,
    pub theme: AppTheme,
    /// Edited since the last save.
    pub modified: bool,
    /// Validation or save error.
    pub error: Option<String>,
    /// Confirmation after a successful save.
    pub success: Option<String>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl SettingsState {
    /// Create settings from the current app configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            theme: AppTheme::from_dark_mode(config.ui.dark_mode),
            modified: false,
            error: None,
            success: None,
        }
    }

    /// Update the base URL.
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
        self.modified = true;
        self.clear_messages();
    }

    /// Update the theme.
    pub fn set_theme(&mut self, theme: AppTheme) {
        self.theme = theme;
        self.modified = true;
        self.clear_messages();
    }

    /// Check the base URL before saving.
    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(self.base_url.trim()).map_err(|e| e.to_string())
    }

    /// Copy the edited values into `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        config.api.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        config.ui.dark_mode = self.theme == AppTheme::Dark;
    }

    /// Mark settings as saved.
    pub fn mark_saved(&mut self) {
        self.modified = false;
        self.error = None;
        self.success = Some("Settings saved successfully".to_string());
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
        self.success = None;
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }
}

/// Render the settings view.
pub fn settings_view(state: &SettingsState) -> Element<'_, Message> {
    let content = column![
        render_header(state),
        rule::horizontal(1),
        render_connection_section(state),
        rule::horizontal(1),
        render_display_section(state),
        rule::horizontal(1),
        render_actions(state),
    ]
    .spacing(20)
    .padding(20);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn render_header(state: &SettingsState) -> Element<'_, Message> {
    let back_button = button(text("<- Back").size(14))
        .on_press(Message::CloseSettings)
        .style(iced::widget::button::secondary);

    let title = text("Settings").size(24);

    let modified_indicator = if state.modified {
        text("(unsaved changes)").size(12).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).warning()),
        })
    } else {
        text("")
    };

    row![back_button, title, modified_indicator]
        .spacing(15)
        .align_y(Alignment::Center)
        .into()
}

fn help_text(content: &str) -> Element<'_, Message> {
    text(content)
        .size(11)
        .style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).text_dimmed()),
        })
        .into()
}

/// Render backend connection section.
fn render_connection_section(state: &SettingsState) -> Element<'_, Message> {
    let base_url_input = text_input("http://localhost:8080/api", &state.base_url)
        .on_input(Message::SetBaseUrl)
        .padding(8)
        .width(Length::Fixed(400.0));

    column![
        text("Backend").size(18),
        text("API base URL:").size(14),
        base_url_input,
        help_text("http:// or https:// address of the CRM API; applies after restart"),
    ]
    .spacing(8)
    .into()
}

/// Theme picker.
fn render_display_section(state: &SettingsState) -> Element<'_, Message> {
    let theme_picker = pick_list(AppTheme::ALL, Some(state.theme), Message::SetTheme);

    column![
        text("Display").size(18),
        row![text("Theme:").size(14), theme_picker]
            .spacing(10)
            .align_y(Alignment::Center),
    ]
    .spacing(8)
    .into()
}

/// Save, reset and log out, with the outcome of the last save.
fn render_actions(state: &SettingsState) -> Element<'_, Message> {
    let mut content = Column::new().spacing(10);

    if let Some(error) = &state.error {
        content = content.push(text(format!("Error: {}", error)).size(14).style(|t: &Theme| {
            text::Style {
                color: Some(theme::colors(t).danger()),
            }
        }));
    }

    if let Some(success) = &state.success {
        content = content.push(text(success).size(14).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).success()),
        }));
    }

    let save_button = button(text("Save Settings").size(14))
        .on_press(Message::SaveSettings)
        .style(iced::widget::button::primary);

    let reset_button = button(text("Reset to Defaults").size(14))
        .on_press(Message::ResetSettings)
        .style(iced::widget::button::secondary);

    let logout_button = button(text("Log out").size(14))
        .on_press(Message::Logout)
        .style(iced::widget::button::danger);

    content
        .push(row![save_button, reset_button, logout_button].spacing(10))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        let mut settings = SettingsState::default();
        assert!(settings.validate().is_ok());

        settings.set_base_url("ftp://example.com".to_string());
        assert!(settings.validate().is_err());

        settings.set_base_url("".to_string());
        assert!(settings.validate().is_err());

        settings.set_base_url(" https://crm.example.com/api ".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_apply_to_config() {
        let mut settings = SettingsState::default();
        settings.set_base_url("https://crm.example.com/api/".to_string());
        settings.set_theme(AppTheme::Dark);
        assert!(settings.modified);

        let mut config = AppConfig::default();
        settings.apply_to(&mut config);
        assert_eq!(config.api.base_url, "https://crm.example.com/api");
        assert!(config.ui.dark_mode);
    }

    #[test]
    fn test_messages_cleared_on_edit() {
        let mut settings = SettingsState::default();
        settings.set_error("bad".to_string());
        settings.set_theme(AppTheme::Light);
        assert!(settings.error.is_none());

        settings.mark_saved();
        assert!(!settings.modified);
        assert!(settings.success.is_some());
    }
}
