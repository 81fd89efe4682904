//! Login screen: business number and password.

use iced::widget::{button, column, container, text, text_input};
use iced::{Alignment, Element, Length, Theme};

use mokisight_common::LoginRequest;

use crate::message::Message;
use crate::view::theme;

/// Login form state.
#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub business_number: String,
    pub password: String,
    /// A login request is in flight.
    pub loading: bool,
    pub error: Option<String>,
}

impl LoginState {
    /// Whether the form can be submitted.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.business_number.trim().is_empty() && !self.password.is_empty()
    }

    /// Build the request and mark the form as loading.
    ///
    /// Returns `None` when the form is incomplete or a request is running.
    pub fn submit(&mut self) -> Option<LoginRequest> {
        if !self.can_submit() {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(LoginRequest {
            business_number: self.business_number.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Record a failed attempt; the password is cleared.
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.password.clear();
        self.error = Some(message);
    }
}

/// Render the login view.
pub fn login_view(state: &LoginState) -> Element<'_, Message> {
    let title = text("MokiSight").size(32);
    let subtitle = text("Log in with your business registration number")
        .size(13)
        .style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).text_muted()),
        });

    let business_input = text_input("Business number", &state.business_number)
        .on_input(Message::SetBusinessNumber)
        .padding(10)
        .width(Length::Fixed(320.0));

    let mut password_input = text_input("Password", &state.password)
        .secure(true)
        .padding(10)
        .width(Length::Fixed(320.0));
    if !state.loading {
        password_input = password_input
            .on_input(Message::SetPassword)
            .on_submit(Message::SubmitLogin);
    }

    let label = if state.loading { "Logging in..." } else { "Log in" };
    let mut login_button = button(text(label).size(14))
        .padding(10)
        .width(Length::Fixed(320.0))
        .style(iced::widget::button::primary);
    if state.can_submit() {
        login_button = login_button.on_press(Message::SubmitLogin);
    }

    let mut form = column![title, subtitle, business_input, password_input, login_button]
        .spacing(12)
        .align_x(Alignment::Center);

    if let Some(error) = &state.error {
        form = form.push(text(error).size(13).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).danger()),
        }));
    }

    container(form)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
