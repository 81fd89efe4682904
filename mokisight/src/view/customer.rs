//! Customer detail view.

use chrono::NaiveDate;
use iced::widget::{Column, button, column, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use mokisight_common::CustomerDetail;

use crate::message::{ApiResult, Message};
use crate::view::chart::{VisitChartState, visit_chart_view};
use crate::view::components::{RiskBadge, ScoreBar};
use crate::view::formatting::{format_last_visit, format_phone_number, format_won};
use crate::view::theme;

/// State for the customer detail view.
#[derive(Debug)]
pub struct CustomerDetailState {
    pub customer_id: u64,
    pub detail: Option<CustomerDetail>,
    /// Visit frequency chart, present once analytics arrived.
    pub chart: Option<VisitChartState>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CustomerDetailState {
    /// A detail view waiting for `customer_id` to load.
    pub fn new(customer_id: u64) -> Self {
        Self {
            customer_id,
            detail: None,
            chart: None,
            loading: true,
            error: None,
        }
    }

    /// Apply a loaded detail; responses for another customer are ignored.
    pub fn apply(&mut self, customer_id: u64, result: ApiResult<CustomerDetail>) -> bool {
        if customer_id != self.customer_id {
            return false;
        }

        self.loading = false;
        match result {
            Ok(detail) => {
                self.chart = detail
                    .analytics
                    .as_ref()
                    .map(|_| VisitChartState::new("Monthly visits", &detail.visit_frequency()));
                self.detail = Some(detail);
                self.error = None;
            }
            Err(failure) => self.error = Some(failure.message),
        }
        true
    }
}

/// Render the customer detail view.
pub fn customer_view(state: &CustomerDetailState, base_date: NaiveDate) -> Element<'_, Message> {
    let back_button = button(text("<- Back").size(14))
        .on_press(Message::CloseDetail)
        .style(iced::widget::button::secondary);

    let title = match &state.detail {
        Some(detail) => text(&detail.name).size(24),
        None => text(format!("Customer #{}", state.customer_id)).size(24),
    };

    let header = row![back_button, title]
        .spacing(15)
        .align_y(Alignment::Center);

    let mut content = Column::new().push(header).push(rule::horizontal(1));

    if let Some(error) = &state.error {
        content = content.push(text(format!("Error: {}", error)).size(13).style(|t: &Theme| {
            text::Style {
                color: Some(theme::colors(t).danger()),
            }
        }));
    }

    match &state.detail {
        Some(detail) => {
            content = content.push(render_profile(detail, base_date));
            content = content.push(match &state.chart {
                Some(chart) => visit_chart_view(chart),
                None => text("No visit history available").size(13).into(),
            });
        }
        None if state.loading => {
            content = content.push(text("Loading...").size(14));
        }
        None => {}
    }

    container(scrollable(content.spacing(16).padding(20)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// A label with its value.
fn field<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    column![
        text(label).size(11).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).text_muted()),
        }),
        text(value).size(16),
    ]
    .spacing(2)
    .width(Length::FillPortion(1))
    .into()
}

fn render_profile(detail: &CustomerDetail, base_date: NaiveDate) -> Element<'_, Message> {
    let contact = row![
        field("Phone", format_phone_number(&detail.phone_number)),
        field("Total spent", format_won(detail.total_spent)),
        field("Points", format!("{} P", detail.current_points)),
    ]
    .spacing(20);

    let visits = row![
        field("Visits", detail.visit.total_visit_count.to_string()),
        field(
            "Last visit",
            format_last_visit(detail.visit.visit_day_ago, base_date)
        ),
        column![
            text("Churn risk").size(11),
            RiskBadge::new(detail.churn_risk_level.clone()).view(),
        ]
        .spacing(4)
        .width(Length::FillPortion(1)),
    ]
    .spacing(20);

    column![
        contact,
        visits,
        ScoreBar::new(detail.loyalty_score, "Loyalty score").view(),
    ]
    .spacing(16)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mokisight_common::{Analytics, ChurnRiskLevel, MonthlyVisit, VisitInfo};

    fn detail(id: u64, with_analytics: bool) -> CustomerDetail {
        CustomerDetail {
            customer_id: id,
            name: "Kim Minji".to_string(),
            phone_number: "01012345678".to_string(),
            total_spent: 350_000,
            loyalty_score: 82,
            churn_risk_level: ChurnRiskLevel::Low,
            current_points: 1200,
            visit: VisitInfo {
                total_visit_count: 24,
                visit_day_ago: 3,
            },
            analytics: with_analytics.then(|| Analytics {
                visit_frequency: vec![
                    MonthlyVisit {
                        month: "2025-10".to_string(),
                        count: 4,
                    },
                    MonthlyVisit {
                        month: "2025-09".to_string(),
                        count: 6,
                    },
                ],
            }),
        }
    }

    #[test]
    fn test_apply_builds_chart_in_order() {
        let mut state = CustomerDetailState::new(7);
        assert!(state.apply(7, Ok(detail(7, true))));
        assert!(!state.loading);

        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.bars()[0].label, "Sep");
        assert_eq!(chart.bars()[1].label, "Oct");
    }

    #[test]
    fn test_apply_without_analytics() {
        let mut state = CustomerDetailState::new(7);
        state.apply(7, Ok(detail(7, false)));
        assert!(state.detail.is_some());
        assert!(state.chart.is_none());
    }

    #[test]
    fn test_other_customer_is_ignored() {
        let mut state = CustomerDetailState::new(7);
        assert!(!state.apply(8, Ok(detail(8, true))));
        assert!(state.detail.is_none());
        assert!(state.loading);
    }
}
