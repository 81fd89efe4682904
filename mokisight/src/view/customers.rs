//! Customer list with segment tabs and incremental paging.

use chrono::NaiveDate;
use iced::widget::{Column, button, column, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use mokisight_common::{CustomerPage, CustomerSummary, Segment};

use crate::message::{ApiResult, Message};
use crate::view::formatting::{format_days_ago, format_last_visit};
use crate::view::theme;

/// A page the list wants loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub segment: Segment,
    pub size: u32,
    pub page: u32,
}

/// Customer list state.
#[derive(Debug, Clone)]
pub struct CustomersState {
    pub segment: Segment,
    pub page_size: u32,
    /// Rows loaded so far, across pages.
    pub customers: Vec<CustomerSummary>,
    /// Index of the last loaded page.
    pub page: Option<u32>,
    pub has_next: bool,
    /// Page currently being fetched.
    pub loading: Option<u32>,
    pub error: Option<String>,
}

impl CustomersState {
    pub fn new(page_size: u32) -> Self {
        Self {
            segment: Segment::All,
            page_size: page_size.max(1),
            customers: Vec::new(),
            page: None,
            has_next: false,
            loading: None,
            error: None,
        }
    }

    /// Switch to `segment` and request its first page.
    ///
    /// The list is cleared even when the segment is unchanged.
    pub fn select_segment(&mut self, segment: Segment) -> PageRequest {
        self.segment = segment;
        self.customers.clear();
        self.page = None;
        self.has_next = false;
        self.error = None;
        self.request(0)
    }

    /// Request the next page, if there is one and nothing is loading.
    pub fn next_request(&mut self) -> Option<PageRequest> {
        if self.loading.is_some() || !self.has_next {
            return None;
        }
        let next = self.page.map_or(0, |page| page + 1);
        Some(self.request(next))
    }

    fn request(&mut self, page: u32) -> PageRequest {
        self.loading = Some(page);
        PageRequest {
            segment: self.segment,
            size: self.page_size,
            page,
        }
    }

    /// Apply a loaded page. Responses for another segment or page are
    /// ignored; returns whether the response was applied.
    pub fn apply_page(&mut self, segment: Segment, page: u32, result: ApiResult<CustomerPage>) -> bool {
        if segment != self.segment || self.loading != Some(page) {
            tracing::debug!(%segment, page, "Ignoring stale customer page");
            return false;
        }

        self.loading = None;
        match result {
            Ok(loaded) => {
                if page == 0 {
                    self.customers = loaded.customers;
                } else {
                    self.customers.extend(loaded.customers);
                }
                self.page = Some(page);
                self.has_next = loaded.has_next;
                self.error = None;
            }
            Err(failure) => self.error = Some(failure.message),
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }
}

/// Render the customer list view.
pub fn customers_view(state: &CustomersState, base_date: NaiveDate) -> Element<'_, Message> {
    let back_button = button(text("<- Back").size(14))
        .on_press(Message::OpenDashboard)
        .style(iced::widget::button::secondary);

    let header = row![
        back_button,
        text("Customers").size(24),
        text(format!("{} shown", state.customers.len())).size(12),
    ]
    .spacing(15)
    .align_y(Alignment::Center);

    let content = column![
        header,
        render_tabs(state),
        rule::horizontal(1),
        render_table(state, base_date),
    ]
    .spacing(12)
    .padding(20);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn render_tabs(state: &CustomersState) -> Element<'_, Message> {
    let mut tabs = row![].spacing(8);

    for segment in Segment::ALL {
        let tab = button(text(segment.label()).size(13)).on_press(Message::SelectSegment(*segment));
        let tab = if *segment == state.segment {
            tab.style(iced::widget::button::primary)
        } else {
            tab.style(iced::widget::button::secondary)
        };
        tabs = tabs.push(tab);
    }

    tabs.into()
}

fn header_cell(label: &str, portion: u16) -> Element<'_, Message> {
    text(label)
        .size(12)
        .width(Length::FillPortion(portion))
        .style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).text_muted()),
        })
        .into()
}

fn render_table(state: &CustomersState, base_date: NaiveDate) -> Element<'_, Message> {
    let table_header = container(
        row![
            header_cell("Name", 3),
            header_cell("Last visit", 3),
            header_cell("Visits", 1),
            header_cell("Loyalty", 1),
        ]
        .spacing(10),
    )
    .padding(8)
    .width(Length::Fill)
    .style(|t: &Theme| container::Style {
        background: Some(iced::Background::Color(theme::colors(t).table_header())),
        ..Default::default()
    });

    let mut rows = Column::new().spacing(4);

    if state.customers.is_empty() && !state.is_loading() {
        rows = rows.push(text("No customers in this segment").size(13));
    }

    for customer in &state.customers {
        let line = row![
            text(&customer.name).size(14).width(Length::FillPortion(3)),
            text(format!(
                "{} ({})",
                format_last_visit(customer.visit_day_ago, base_date),
                format_days_ago(customer.visit_day_ago)
            ))
            .size(12)
            .width(Length::FillPortion(3)),
            text(customer.total_visit_count.to_string())
                .size(12)
                .width(Length::FillPortion(1)),
            text(customer.loyalty_score.to_string())
                .size(12)
                .width(Length::FillPortion(1)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        rows = rows.push(
            button(line)
                .on_press(Message::SelectCustomer(customer.customer_id))
                .padding(8)
                .width(Length::Fill)
                .style(iced::widget::button::secondary),
        );
    }

    if let Some(error) = &state.error {
        rows = rows.push(text(format!("Error: {}", error)).size(12).style(|t: &Theme| {
            text::Style {
                color: Some(theme::colors(t).danger()),
            }
        }));
    }

    if state.is_loading() {
        rows = rows.push(text("Loading...").size(12));
    } else if state.has_next {
        rows = rows.push(
            button(text("Show more").size(13))
                .on_press(Message::ShowMore)
                .style(iced::widget::button::secondary),
        );
    }

    column![table_header, scrollable(rows).height(Length::Fill)]
        .spacing(4)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ApiFailure;

    fn page(ids: std::ops::Range<u64>, page: u32, has_next: bool) -> CustomerPage {
        CustomerPage {
            customers: ids
                .map(|id| CustomerSummary {
                    customer_id: id,
                    name: format!("Customer {}", id),
                    visit_day_ago: 3,
                    total_visit_count: 10,
                    loyalty_score: 80,
                })
                .collect(),
            size: 20,
            page,
            has_next,
        }
    }

    #[test]
    fn test_select_segment_requests_first_page() {
        let mut state = CustomersState::new(20);
        let request = state.select_segment(Segment::Loyal);
        assert_eq!(
            request,
            PageRequest {
                segment: Segment::Loyal,
                size: 20,
                page: 0
            }
        );
        assert!(state.is_loading());
    }

    #[test]
    fn test_show_more_only_when_has_next() {
        let mut state = CustomersState::new(20);
        state.select_segment(Segment::All);
        assert!(state.next_request().is_none(), "page 0 still loading");

        assert!(state.apply_page(Segment::All, 0, Ok(page(0..20, 0, true))));
        let next = state.next_request().unwrap();
        assert_eq!(next.page, 1);

        assert!(state.apply_page(Segment::All, 1, Ok(page(20..30, 1, false))));
        assert_eq!(state.customers.len(), 30);
        assert!(state.next_request().is_none());
    }

    #[test]
    fn test_segment_switch_resets_list() {
        let mut state = CustomersState::new(20);
        state.select_segment(Segment::All);
        state.apply_page(Segment::All, 0, Ok(page(0..20, 0, true)));

        let request = state.select_segment(Segment::ChurnRisk);
        assert_eq!(request.page, 0);
        assert!(state.customers.is_empty());
        assert!(!state.has_next);
    }

    #[test]
    fn test_stale_pages_are_ignored() {
        let mut state = CustomersState::new(20);
        state.select_segment(Segment::All);
        state.select_segment(Segment::Loyal);

        assert!(!state.apply_page(Segment::All, 0, Ok(page(0..20, 0, true))));
        assert!(state.customers.is_empty());
        assert!(state.is_loading());

        assert!(state.apply_page(Segment::Loyal, 0, Ok(page(100..105, 0, false))));
        assert_eq!(state.customers[0].customer_id, 100);
    }

    #[test]
    fn test_failed_page_keeps_rows() {
        let mut state = CustomersState::new(20);
        state.select_segment(Segment::All);
        state.apply_page(Segment::All, 0, Ok(page(0..20, 0, true)));
        state.next_request();

        let failure = ApiFailure {
            message: "timeout".to_string(),
            auth: false,
        };
        assert!(state.apply_page(Segment::All, 1, Err(failure)));
        assert_eq!(state.customers.len(), 20);
        assert_eq!(state.error.as_deref(), Some("timeout"));
        assert_eq!(state.next_request().map(|r| r.page), Some(1));
    }
}
