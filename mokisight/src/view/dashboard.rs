//! Main dashboard: weekly figures, declining loyal customers and a preview
//! of at-risk loyal customers.

use chrono::NaiveDate;
use iced::widget::{Column, button, column, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use mokisight_common::{CustomerPage, CustomerSummary, DeclineSummary, Segment, WeeklySummary};

use crate::message::{ApiResult, Message};
use crate::view::components::GaugeView;
use crate::view::formatting::{
    format_count_change, format_last_visit, format_rate, format_rate_change, format_short_date,
    format_won, format_won_change,
};
use crate::view::theme;

/// Number of dashboard requests issued by a refresh.
const DASHBOARD_REQUESTS: u8 = 3;

/// Dashboard view state.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub weekly: Option<WeeklySummary>,
    pub decline: Option<DeclineSummary>,
    /// First page of the at-risk loyal segment.
    pub preview: Vec<CustomerSummary>,
    /// Churn gauge showing the decline ratio.
    pub gauge: GaugeView,
    /// Requests still in flight.
    pending: u8,
    /// Generation of the latest refresh; responses tagged otherwise are stale.
    refresh: u64,
    /// Last error message, if any.
    pub error: Option<String>,
}

impl DashboardState {
    /// Mark all dashboard requests as in flight. Returns the generation
    /// the responses must carry.
    pub fn begin_refresh(&mut self) -> u64 {
        self.refresh += 1;
        self.pending = DASHBOARD_REQUESTS;
        self.error = None;
        self.refresh
    }

    /// Generation of the latest refresh.
    pub fn refresh(&self) -> u64 {
        self.refresh
    }

    /// Whether a response tagged `refresh` belongs to the latest refresh.
    pub fn is_current(&self, refresh: u64) -> bool {
        if refresh != self.refresh {
            tracing::debug!(refresh, current = self.refresh, "Ignoring stale dashboard response");
            return false;
        }
        true
    }

    /// Whether any dashboard request is still in flight.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn apply_weekly(&mut self, result: ApiResult<WeeklySummary>) {
        self.finish_request();
        match result {
            Ok(weekly) => self.weekly = Some(weekly),
            Err(failure) => self.error = Some(failure.message),
        }
    }

    /// Store the decline summary and point the gauge at its ratio.
    pub fn apply_decline(&mut self, result: ApiResult<DeclineSummary>) {
        self.finish_request();
        match result {
            Ok(decline) => {
                self.gauge.set_target(f64::from(decline.decline_ratio));
                self.decline = Some(decline);
            }
            Err(failure) => self.error = Some(failure.message),
        }
    }

    pub fn apply_preview(&mut self, result: ApiResult<CustomerPage>) {
        self.finish_request();
        match result {
            Ok(page) => self.preview = page.customers,
            Err(failure) => self.error = Some(failure.message),
        }
    }

    fn finish_request(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    /// Drop all loaded data and stop the gauge. Responses still in flight
    /// become stale.
    pub fn clear(&mut self) {
        self.refresh += 1;
        self.weekly = None;
        self.decline = None;
        self.preview.clear();
        self.pending = 0;
        self.error = None;
        self.gauge.reset();
    }
}

/// Render the dashboard view.
pub fn dashboard_view(state: &DashboardState, base_date: NaiveDate) -> Element<'_, Message> {
    let header = render_header(state);
    let cards = row![render_weekly_card(state), render_decline_card(state)]
        .spacing(20)
        .height(Length::Shrink);
    let preview = render_preview(state, base_date);

    let content = column![header, rule::horizontal(1), cards, preview]
        .spacing(16)
        .padding(20);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render the header with navigation buttons.
fn render_header(state: &DashboardState) -> Element<'_, Message> {
    let title = text("MokiSight Dashboard").size(24);

    let status = if state.is_loading() {
        text("Loading...").size(12)
    } else {
        text("")
    };

    let refresh_button = button(text("Refresh").size(14)).style(iced::widget::button::secondary);
    let refresh_button = if state.is_loading() {
        refresh_button
    } else {
        refresh_button.on_press(Message::RefreshDashboard)
    };

    let customers_button = button(text("Customers").size(14))
        .on_press(Message::OpenCustomers(Segment::All))
        .style(iced::widget::button::secondary);

    let settings_button = button(text("Settings").size(14))
        .on_press(Message::OpenSettings)
        .style(iced::widget::button::secondary);

    let logout_button = button(text("Log out").size(14))
        .on_press(Message::Logout)
        .style(iced::widget::button::secondary);

    let header_row = row![
        title,
        status,
        refresh_button,
        customers_button,
        settings_button,
        logout_button
    ]
    .spacing(20)
    .align_y(Alignment::Center);

    let mut header_col = Column::new().push(header_row);

    if let Some(ref error) = state.error {
        let error_text = text(format!("Error: {}", error))
            .size(12)
            .style(|t: &Theme| text::Style {
                color: Some(theme::colors(t).danger()),
            });
        header_col = header_col.push(error_text);
    }

    header_col.spacing(5).into()
}

/// Card container shared by the dashboard panels.
fn card<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(16)
        .width(Length::FillPortion(1))
        .style(|t: &Theme| {
            let colors = theme::colors(t);
            container::Style {
                background: Some(iced::Background::Color(colors.card_background())),
                border: iced::Border {
                    color: colors.border(),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

/// A figure with its change against last week.
fn metric_row<'a>(label: &'a str, value: String, change: String, delta: f64) -> Element<'a, Message> {
    let change_text = text(change).size(12).style(move |t: &Theme| text::Style {
        color: Some(theme::colors(t).change(delta)),
    });

    row![
        text(label).size(13).width(Length::Fixed(120.0)),
        text(value).size(18),
        change_text
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn render_weekly_card(state: &DashboardState) -> Element<'_, Message> {
    let title = text("This week").size(18);

    let Some(weekly) = &state.weekly else {
        let placeholder = if state.is_loading() {
            "Loading..."
        } else {
            "No data"
        };
        return card(column![title, text(placeholder).size(13)].spacing(12));
    };

    let period = text(format!(
        "{} - {}",
        format_short_date(&weekly.start_date),
        format_short_date(&weekly.end_date)
    ))
    .size(12)
    .style(|t: &Theme| text::Style {
        color: Some(theme::colors(t).text_muted()),
    });

    let content = column![
        row![title, period].spacing(10).align_y(Alignment::Center),
        metric_row(
            "Sales",
            format_won(weekly.total_sales),
            format_won_change(weekly.sales_change),
            weekly.sales_change as f64,
        ),
        metric_row(
            "Visitors",
            weekly.visited_customer_count.to_string(),
            format_count_change(weekly.customer_count_change),
            weekly.customer_count_change as f64,
        ),
        metric_row(
            "Revisit rate",
            format_rate(weekly.revisit_rate),
            format_rate_change(weekly.revisit_rate_change),
            weekly.revisit_rate_change,
        ),
    ]
    .spacing(12);

    card(content)
}

fn render_decline_card(state: &DashboardState) -> Element<'_, Message> {
    let title = text("Declining loyal customers").size(18);

    let Some(decline) = state.decline else {
        let placeholder = if state.is_loading() {
            "Loading..."
        } else {
            "No data"
        };
        return card(column![title, text(placeholder).size(13)].spacing(12));
    };

    let count = text(format!("{} customers", decline.decline_count)).size(20);
    let caption = text("Share of loyal customers visiting less often")
        .size(12)
        .style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).text_muted()),
        });

    let details = column![count, caption].spacing(6);

    let content = column![
        title,
        row![state.gauge.view(220.0), details]
            .spacing(20)
            .align_y(Alignment::Center),
    ]
    .spacing(12);

    card(content)
}

fn render_preview(state: &DashboardState, base_date: NaiveDate) -> Element<'_, Message> {
    let title = text(Segment::AtRiskLoyal.label()).size(18);
    let view_all = button(text("View all").size(12))
        .on_press(Message::OpenCustomers(Segment::AtRiskLoyal))
        .style(iced::widget::button::text);

    let header = row![title, view_all].spacing(10).align_y(Alignment::Center);

    let mut list = Column::new().spacing(6);

    if state.preview.is_empty() {
        let message = if state.is_loading() {
            "Loading..."
        } else {
            "No at-risk loyal customers"
        };
        list = list.push(text(message).size(13));
    }

    for customer in &state.preview {
        let line = row![
            text(&customer.name).size(14).width(Length::FillPortion(2)),
            text(format!(
                "Last visit {}",
                format_last_visit(customer.visit_day_ago, base_date)
            ))
            .size(12)
            .width(Length::FillPortion(2)),
            text(format!("{} visits", customer.total_visit_count))
                .size(12)
                .width(Length::FillPortion(1)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        list = list.push(
            button(line)
                .on_press(Message::SelectCustomer(customer.customer_id))
                .padding(8)
                .width(Length::Fill)
                .style(iced::widget::button::secondary),
        );
    }

    card(column![header, list].spacing(10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ApiFailure;

    fn failure(message: &str) -> ApiFailure {
        ApiFailure {
            message: message.to_string(),
            auth: false,
        }
    }

    #[test]
    fn test_refresh_tracks_pending_requests() {
        let mut state = DashboardState::default();
        state.begin_refresh();
        assert!(state.is_loading());

        state.apply_weekly(Err(failure("boom")));
        state.apply_preview(Ok(CustomerPage::default()));
        assert!(state.is_loading());

        state.apply_decline(Ok(DeclineSummary {
            decline_count: 4,
            decline_ratio: 45,
        }));
        assert!(!state.is_loading());
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_refresh_generations() {
        let mut state = DashboardState::default();
        let first = state.begin_refresh();
        assert!(state.is_current(first));

        let second = state.begin_refresh();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));

        state.clear();
        assert!(!state.is_current(second));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_decline_drives_gauge() {
        let mut state = DashboardState::default();
        state.apply_decline(Ok(DeclineSummary {
            decline_count: 7,
            decline_ratio: 150,
        }));
        assert!(state.gauge.is_running());
        assert_eq!(state.gauge.target(), 100.0);
    }

    #[test]
    fn test_unchanged_ratio_keeps_gauge_idle() {
        let decline = DeclineSummary {
            decline_count: 3,
            decline_ratio: 30,
        };
        let mut state = DashboardState::default();
        state.apply_decline(Ok(decline));

        let start = std::time::Instant::now();
        state.gauge.on_frame(start);
        state.gauge.on_frame(start + std::time::Duration::from_secs(3));
        assert!(!state.gauge.is_running());

        state.apply_decline(Ok(decline));
        assert!(!state.gauge.is_running());
        assert_eq!(state.gauge.value(), 30.0);
    }

    #[test]
    fn test_clear_resets_gauge() {
        let mut state = DashboardState::default();
        state.apply_decline(Ok(DeclineSummary {
            decline_count: 1,
            decline_ratio: 20,
        }));
        state.clear();
        assert!(state.decline.is_none());
        assert!(!state.gauge.is_running());
        assert_eq!(state.gauge.value(), 0.0);
    }
}
