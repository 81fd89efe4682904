//! UI tests using iced_test Simulator.
//!
//! These tests verify the UI behavior without needing a running CRM backend.
//! Views containing the gauge or chart canvas are covered by unit tests.

use chrono::NaiveDate;
use iced_test::simulator;

use mokisight::message::Message;
use mokisight::mock;
use mokisight::view::customer::{CustomerDetailState, customer_view};
use mokisight::view::customers::{CustomersState, customers_view};
use mokisight::view::dashboard::{DashboardState, dashboard_view};
use mokisight::view::login::{LoginState, login_view};
use mokisight::view::settings::{SettingsState, settings_view};

use mokisight_common::Segment;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 6).unwrap()
}

/// Test that the login view renders its form.
#[test]
fn test_login_view() {
    let state = LoginState::default();
    let mut ui = simulator(login_view(&state));

    assert!(ui.find("MokiSight").is_ok());
    assert!(ui.find("Log in").is_ok());
}

/// Test clicking Log in with both fields filled.
#[test]
fn test_login_submit_button() {
    let state = LoginState {
        business_number: "123-45-67890".to_string(),
        password: "secret".to_string(),
        ..LoginState::default()
    };
    let mut ui = simulator(login_view(&state));

    let _ = ui.click("Log in");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::SubmitLogin)));
}

/// Test that a login error is shown.
#[test]
fn test_login_error_shown() {
    let mut state = LoginState::default();
    state.fail("Invalid credentials".to_string());
    let mut ui = simulator(login_view(&state));

    assert!(ui.find("Invalid credentials").is_ok());
}

/// Test the dashboard before the decline summary arrives.
#[test]
fn test_dashboard_weekly_card() {
    let mut state = DashboardState::default();
    state.apply_weekly(Ok(mock::weekly_summary()));

    let mut ui = simulator(dashboard_view(&state, base_date()));

    assert!(ui.find("This week").is_ok());
    assert!(ui.find("₩3,500,000").is_ok());
    assert!(ui.find("64%").is_ok());
}

/// Test clicking the Settings button on the dashboard.
#[test]
fn test_dashboard_settings_button() {
    let state = DashboardState::default();
    let mut ui = simulator(dashboard_view(&state, base_date()));

    let _ = ui.click("Settings");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::OpenSettings)));
}

/// Test that View all opens the at-risk loyal segment.
#[test]
fn test_dashboard_view_all_button() {
    let mut state = DashboardState::default();
    state.apply_preview(Ok(mock::customer_page(1..4, 0, false)));
    let mut ui = simulator(dashboard_view(&state, base_date()));

    assert!(ui.find("Customer 2").is_ok());
    let _ = ui.click("View all");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::OpenCustomers(Segment::AtRiskLoyal)))
    );
}

/// Test the customer list with a further page available.
#[test]
fn test_customers_show_more() {
    let mut state = CustomersState::new(3);
    let request = state.select_segment(Segment::Loyal);
    state.apply_page(request.segment, 0, Ok(mock::customer_page(0..3, 0, true)));

    let mut ui = simulator(customers_view(&state, base_date()));

    assert!(ui.find("Customer 0").is_ok());
    assert!(ui.find("3 shown").is_ok());
    let _ = ui.click("Show more");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::ShowMore)));
}

/// Test clicking a customer row.
#[test]
fn test_customers_select_row() {
    let mut state = CustomersState::new(20);
    let request = state.select_segment(Segment::All);
    state.apply_page(request.segment, 0, Ok(mock::customer_page(5..8, 0, false)));

    let mut ui = simulator(customers_view(&state, base_date()));

    assert!(ui.find("Show more").is_err());
    let _ = ui.click("Customer 6");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::SelectCustomer(6)))
    );
}

/// Test switching segment tabs.
#[test]
fn test_customers_segment_tab() {
    let state = CustomersState::new(20);
    let mut ui = simulator(customers_view(&state, base_date()));

    let _ = ui.click("Churn risk");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::SelectSegment(Segment::ChurnRisk)))
    );
}

/// Test the detail view of a customer without visit analytics.
#[test]
fn test_customer_detail_without_analytics() {
    let mut state = CustomerDetailState::new(3);
    state.apply(3, Ok(mock::customer_detail(3, "Kim Minji", false)));

    let mut ui = simulator(customer_view(&state, base_date()));

    assert!(ui.find("Kim Minji").is_ok());
    assert!(ui.find("010-1234-5678").is_ok());
    assert!(ui.find("₩350,000").is_ok());
    assert!(ui.find("No visit history available").is_ok());
}

/// Test clicking Back in the detail view.
#[test]
fn test_customer_detail_back_button() {
    let state = CustomerDetailState::new(3);
    let mut ui = simulator(customer_view(&state, base_date()));

    assert!(ui.find("Loading...").is_ok());
    let _ = ui.click("<- Back");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::CloseDetail)));
}

/// Test settings view renders correctly.
#[test]
fn test_settings_view() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    assert!(ui.find("Settings").is_ok());
    assert!(ui.find("Backend").is_ok());
    assert!(ui.find("Theme:").is_ok());
    assert!(ui.find("Save Settings").is_ok());
}

/// Test clicking Save Settings button.
#[test]
fn test_settings_save_button() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    let _ = ui.click("Save Settings");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::SaveSettings)));
}

/// Test that unsaved changes are flagged.
#[test]
fn test_settings_modified_indicator() {
    let mut state = SettingsState::default();
    state.set_base_url("https://crm.example.com/api".to_string());
    let mut ui = simulator(settings_view(&state));

    assert!(ui.find("(unsaved changes)").is_ok());
}
