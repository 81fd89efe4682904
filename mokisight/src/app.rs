//! MokiSight Iced application.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use iced::{Element, Subscription, Task, Theme};

use mokisight_common::{AppConfig, CrmApi, Segment, TokenStore};

use crate::message::{ApiFailure, ApiResult, Message};
use crate::subscription::gauge_frames;
use crate::view::customer::{CustomerDetailState, customer_view};
use crate::view::customers::{CustomersState, PageRequest, customers_view};
use crate::view::dashboard::{DashboardState, dashboard_view};
use crate::view::login::{LoginState, login_view};
use crate::view::settings::{SettingsState, settings_view};

/// Color scheme selectable in the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppTheme {
    #[default]
    Light,
    Dark,
}

impl AppTheme {
    /// All available themes.
    pub const ALL: &'static [AppTheme] = &[AppTheme::Light, AppTheme::Dark];

    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            AppTheme::Dark
        } else {
            AppTheme::Light
        }
    }
}

impl fmt::Display for AppTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppTheme::Light => write!(f, "Light"),
            AppTheme::Dark => write!(f, "Dark"),
        }
    }
}

impl From<AppTheme> for Theme {
    fn from(theme: AppTheme) -> Self {
        match theme {
            AppTheme::Light => Theme::Light,
            AppTheme::Dark => Theme::Dark,
        }
    }
}

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Customers,
    CustomerDetail,
    Settings,
}

/// Everything the application needs at startup.
#[derive(Clone)]
pub struct Flags {
    pub config: AppConfig,
    /// Where settings are saved; `None` disables saving.
    pub config_path: Option<PathBuf>,
    pub api: Arc<dyn CrmApi>,
    /// Token persistence; `None` keeps the session in memory only.
    pub tokens: Option<TokenStore>,
}

/// The main MokiSight application.
pub struct MokiSight {
    config: AppConfig,
    config_path: Option<PathBuf>,
    api: Arc<dyn CrmApi>,
    tokens: Option<TokenStore>,
    screen: Screen,
    /// Screen to return to when leaving settings or a customer.
    previous: Screen,
    login: LoginState,
    dashboard: DashboardState,
    customers: CustomersState,
    detail: Option<CustomerDetailState>,
    settings: SettingsState,
    theme: AppTheme,
    /// Reference day for "days ago" dates.
    base_date: NaiveDate,
}

impl MokiSight {
    /// Create the application. A stored token skips the login screen.
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let Flags {
            config,
            config_path,
            api,
            tokens,
        } = flags;

        let base_date = config
            .ui
            .base_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        let stored_token = tokens.as_ref().and_then(|store| match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                None
            }
        });

        let mut app = Self {
            customers: CustomersState::new(config.ui.page_size),
            settings: SettingsState::from_config(&config),
            theme: AppTheme::from_dark_mode(config.ui.dark_mode),
            config,
            config_path,
            api,
            tokens,
            screen: Screen::Login,
            previous: Screen::Dashboard,
            login: LoginState::default(),
            dashboard: DashboardState::default(),
            detail: None,
            base_date,
        };

        let task = match stored_token {
            Some(token) => {
                tracing::info!("Resuming stored session");
                app.api.set_token(Some(token));
                app.open_dashboard()
            }
            None => Task::none(),
        };

        (app, task)
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        match self.screen {
            Screen::Login => "MokiSight".to_string(),
            Screen::Dashboard => "MokiSight - Dashboard".to_string(),
            Screen::Customers => format!("MokiSight - {}", self.customers.segment.label()),
            Screen::CustomerDetail => match self.detail.as_ref().and_then(|d| d.detail.as_ref()) {
                Some(detail) => format!("MokiSight - {}", detail.name),
                None => "MokiSight - Customer".to_string(),
            },
            Screen::Settings => "MokiSight - Settings".to_string(),
        }
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    pub fn customers(&self) -> &CustomersState {
        &self.customers
    }

    pub fn detail(&self) -> Option<&CustomerDetailState> {
        self.detail.as_ref()
    }

    pub fn login(&self) -> &LoginState {
        &self.login
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Login
            Message::SetBusinessNumber(value) => {
                self.login.business_number = value;
                self.login.error = None;
            }

            Message::SetPassword(value) => {
                self.login.password = value;
                self.login.error = None;
            }

            Message::SubmitLogin => {
                if let Some(request) = self.login.submit() {
                    tracing::info!(business_number = %request.business_number, "Logging in");
                    let api = self.api.clone();
                    return perform(async move { api.login(&request).await }, Message::LoginFinished);
                }
            }

            Message::LoginFinished(Ok(token)) => {
                self.login.loading = false;
                self.login.password.clear();
                self.api.set_token(Some(token.clone()));
                if let Some(store) = &self.tokens
                    && let Err(e) = store.save(&token)
                {
                    tracing::warn!(error = %e, "Failed to store auth token");
                }
                tracing::info!("Logged in");
                return self.open_dashboard();
            }

            Message::LoginFinished(Err(failure)) => {
                tracing::warn!(error = %failure.message, "Login failed");
                self.login.fail(failure.message);
            }

            Message::Logout => {
                self.logout(None);
            }

            // Dashboard
            Message::OpenDashboard => {
                return self.open_dashboard();
            }

            Message::RefreshDashboard => {
                return self.refresh_dashboard();
            }

            Message::WeeklyLoaded(refresh, result) => {
                if !self.dashboard.is_current(refresh) {
                    return Task::none();
                }
                if let Some(failure) = auth_failure(&result) {
                    return self.logout(Some(failure));
                }
                self.dashboard.apply_weekly(result);
            }

            Message::DeclineLoaded(refresh, result) => {
                if !self.dashboard.is_current(refresh) {
                    return Task::none();
                }
                if let Some(failure) = auth_failure(&result) {
                    return self.logout(Some(failure));
                }
                self.dashboard.apply_decline(result);
                if self.screen != Screen::Dashboard {
                    // Arrived after the user left; don't animate off-screen.
                    self.dashboard.gauge.reset();
                }
            }

            Message::PreviewLoaded(refresh, result) => {
                if !self.dashboard.is_current(refresh) {
                    return Task::none();
                }
                if let Some(failure) = auth_failure(&result) {
                    return self.logout(Some(failure));
                }
                self.dashboard.apply_preview(result);
            }

            Message::GaugeFrame(now) => {
                if self.screen == Screen::Dashboard {
                    self.dashboard.gauge.on_frame(now);
                }
            }

            // Customer list
            Message::OpenCustomers(segment) => {
                self.leave_current_screen();
                self.screen = Screen::Customers;
                let request = self.customers.select_segment(segment);
                return self.load_page(request);
            }

            Message::SelectSegment(segment) => {
                let request = self.customers.select_segment(segment);
                return self.load_page(request);
            }

            Message::ShowMore => {
                if let Some(request) = self.customers.next_request() {
                    return self.load_page(request);
                }
            }

            Message::CustomersLoaded {
                segment,
                page,
                result,
            } => {
                if let Some(failure) = auth_failure(&result) {
                    return self.logout(Some(failure));
                }
                self.customers.apply_page(segment, page, result);
            }

            // Customer detail
            Message::SelectCustomer(customer_id) => {
                tracing::info!(customer_id, "Selected customer");
                self.leave_current_screen();
                self.previous = self.screen;
                self.screen = Screen::CustomerDetail;
                self.detail = Some(CustomerDetailState::new(customer_id));

                let api = self.api.clone();
                return perform(
                    async move { api.customer_detail(customer_id).await },
                    move |result| Message::DetailLoaded(customer_id, result),
                );
            }

            Message::DetailLoaded(customer_id, result) => {
                if let Some(failure) = auth_failure(&result) {
                    return self.logout(Some(failure));
                }
                if let Some(detail) = &mut self.detail {
                    detail.apply(customer_id, result);
                }
            }

            Message::CloseDetail => {
                self.detail = None;
                return self.return_to_previous();
            }

            // Settings
            Message::OpenSettings => {
                if self.screen != Screen::Settings {
                    self.leave_current_screen();
                    self.previous = self.screen;
                    self.settings = SettingsState::from_config(&self.config);
                    self.screen = Screen::Settings;
                }
            }

            Message::CloseSettings => {
                self.theme = AppTheme::from_dark_mode(self.config.ui.dark_mode);
                return self.return_to_previous();
            }

            Message::SetBaseUrl(url) => {
                self.settings.set_base_url(url);
            }

            Message::SetTheme(theme) => {
                self.settings.set_theme(theme);
                self.theme = theme;
            }

            Message::SaveSettings => {
                self.save_settings();
            }

            Message::ResetSettings => {
                self.settings = SettingsState::from_config(&AppConfig::default());
                self.settings.modified = true;
                self.theme = self.settings.theme;
            }
        }

        Task::none()
    }

    /// Subscribe to display frames only while the gauge animates.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.screen == Screen::Dashboard && self.dashboard.gauge.is_running() {
            gauge_frames()
        } else {
            Subscription::none()
        }
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        match self.screen {
            Screen::Login => login_view(&self.login),
            Screen::Dashboard => dashboard_view(&self.dashboard, self.base_date),
            Screen::Customers => customers_view(&self.customers, self.base_date),
            Screen::CustomerDetail => match &self.detail {
                Some(detail) => customer_view(detail, self.base_date),
                None => customers_view(&self.customers, self.base_date),
            },
            Screen::Settings => settings_view(&self.settings),
        }
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        self.theme.into()
    }

    fn open_dashboard(&mut self) -> Task<Message> {
        self.leave_current_screen();
        self.screen = Screen::Dashboard;
        self.refresh_dashboard()
    }

    /// Load weekly figures, the decline summary and the at-risk preview
    /// concurrently.
    fn refresh_dashboard(&mut self) -> Task<Message> {
        let refresh = self.dashboard.begin_refresh();
        let preview_size = self.config.ui.preview_size;

        let weekly = {
            let api = self.api.clone();
            perform(async move { api.weekly_summary().await }, move |result| {
                Message::WeeklyLoaded(refresh, result)
            })
        };
        let decline = {
            let api = self.api.clone();
            perform(async move { api.decline_summary().await }, move |result| {
                Message::DeclineLoaded(refresh, result)
            })
        };
        let preview = {
            let api = self.api.clone();
            perform(
                async move { api.customers(Segment::AtRiskLoyal, preview_size, 0).await },
                move |result| Message::PreviewLoaded(refresh, result),
            )
        };

        Task::batch([weekly, decline, preview])
    }

    fn load_page(&self, request: PageRequest) -> Task<Message> {
        let PageRequest {
            segment,
            size,
            page,
        } = request;
        tracing::debug!(%segment, size, page, "Loading customers");

        let api = self.api.clone();
        perform(
            async move { api.customers(segment, size, page).await },
            move |result| Message::CustomersLoaded {
                segment,
                page,
                result,
            },
        )
    }

    /// Tear down state owned by the current screen before switching.
    fn leave_current_screen(&mut self) {
        if self.screen == Screen::Dashboard {
            self.dashboard.gauge.reset();
        }
    }

    fn return_to_previous(&mut self) -> Task<Message> {
        match self.previous {
            Screen::Dashboard => self.open_dashboard(),
            Screen::CustomerDetail if self.detail.is_some() => {
                self.screen = Screen::CustomerDetail;
                self.previous = Screen::Customers;
                Task::none()
            }
            Screen::Customers | Screen::CustomerDetail => {
                self.screen = Screen::Customers;
                self.previous = Screen::Dashboard;
                Task::none()
            }
            Screen::Login | Screen::Settings => self.open_dashboard(),
        }
    }

    /// End the session and show the login screen, with an optional reason.
    fn logout(&mut self, reason: Option<ApiFailure>) -> Task<Message> {
        match &reason {
            Some(failure) => tracing::warn!(error = %failure.message, "Session rejected"),
            None => tracing::info!("Logged out"),
        }

        self.api.set_token(None);
        if let Some(store) = &self.tokens
            && let Err(e) = store.clear()
        {
            tracing::warn!(error = %e, "Failed to clear stored token");
        }

        self.dashboard.clear();
        self.customers = CustomersState::new(self.config.ui.page_size);
        self.detail = None;
        self.login = LoginState {
            business_number: std::mem::take(&mut self.login.business_number),
            error: reason.map(|failure| failure.message),
            ..LoginState::default()
        };
        self.previous = Screen::Dashboard;
        self.screen = Screen::Login;

        Task::none()
    }

    fn save_settings(&mut self) {
        if let Err(error) = self.settings.validate() {
            self.settings.set_error(error);
            return;
        }

        let mut config = self.config.clone();
        self.settings.apply_to(&mut config);

        if let Some(path) = &self.config_path
            && let Err(e) = config.save(path)
        {
            tracing::error!(error = %e, "Failed to save settings");
            self.settings.set_error(e.to_string());
            return;
        }

        self.config = config;
        self.theme = AppTheme::from_dark_mode(self.config.ui.dark_mode);
        self.settings.mark_saved();
    }
}

/// Run a backend call on the executor and wrap its result in a message.
fn perform<T, F>(
    call: F,
    on_done: impl Fn(ApiResult<T>) -> Message + Send + 'static,
) -> Task<Message>
where
    T: Send + 'static,
    F: Future<Output = mokisight_common::Result<T>> + Send + 'static,
{
    Task::perform(async move { call.await.map_err(ApiFailure::from) }, on_done)
}

/// The failure of `result` if it invalidates the session.
fn auth_failure<T>(result: &ApiResult<T>) -> Option<ApiFailure> {
    match result {
        Err(failure) if failure.auth => Some(failure.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{DEFAULT_SEED, DemoBackend};
    use crate::mock;
    use std::time::{Duration, Instant};

    fn demo_flags() -> Flags {
        let mut config = AppConfig::default();
        config.ui.base_date = Some("2025-11-06".to_string());
        let base_date = NaiveDate::from_ymd_opt(2025, 11, 6).unwrap();
        Flags {
            config,
            config_path: None,
            api: Arc::new(DemoBackend::new(DEFAULT_SEED, base_date)),
            tokens: None,
        }
    }

    fn logged_in_app() -> MokiSight {
        let (mut app, _) = MokiSight::new(demo_flags());
        let _ = app.update(Message::LoginFinished(Ok("demo-token".to_string())));
        app
    }

    fn session_expired() -> ApiFailure {
        ApiFailure {
            message: "Session expired, please log in again".to_string(),
            auth: true,
        }
    }

    #[test]
    fn test_starts_on_login_without_token() {
        let (app, _) = MokiSight::new(demo_flags());
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(app.base_date, NaiveDate::from_ymd_opt(2025, 11, 6).unwrap());
    }

    #[test]
    fn test_stored_token_skips_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store.save("abc").unwrap();

        let mut flags = demo_flags();
        flags.tokens = Some(store);
        let (app, _) = MokiSight::new(flags);
        assert_eq!(app.screen(), Screen::Dashboard);
        assert!(app.dashboard().is_loading());
    }

    #[test]
    fn test_login_success_opens_dashboard() {
        let app = logged_in_app();
        assert_eq!(app.screen(), Screen::Dashboard);
        assert!(!app.login().loading);
    }

    #[test]
    fn test_gauge_runs_only_on_dashboard() {
        let mut app = logged_in_app();
        let refresh = app.dashboard().refresh();
        let _ = app.update(Message::DeclineLoaded(refresh, Ok(mock::decline_summary(5, 45))));
        assert!(app.dashboard().gauge.is_running());

        let start = Instant::now();
        let _ = app.update(Message::GaugeFrame(start));
        let _ = app.update(Message::GaugeFrame(start + Duration::from_millis(800)));
        assert_eq!(app.dashboard().gauge.value(), 100.0);

        // Leaving the dashboard tears the animation down.
        let _ = app.update(Message::OpenCustomers(Segment::Loyal));
        assert_eq!(app.screen(), Screen::Customers);
        assert!(!app.dashboard().gauge.is_running());

        let _ = app.update(Message::GaugeFrame(start + Duration::from_millis(2500)));
        assert_eq!(app.dashboard().gauge.value(), 0.0);
    }

    #[test]
    fn test_late_decline_does_not_animate_off_screen() {
        let mut app = logged_in_app();
        let refresh = app.dashboard().refresh();
        let _ = app.update(Message::OpenCustomers(Segment::All));
        let _ = app.update(Message::DeclineLoaded(refresh, Ok(mock::decline_summary(5, 45))));
        assert!(!app.dashboard().gauge.is_running());
    }

    #[test]
    fn test_returning_to_dashboard_restarts_gauge() {
        let mut app = logged_in_app();
        let first = app.dashboard().refresh();
        let _ = app.update(Message::DeclineLoaded(first, Ok(mock::decline_summary(5, 45))));
        let _ = app.update(Message::OpenSettings);
        assert!(!app.dashboard().gauge.is_running());

        let _ = app.update(Message::CloseSettings);
        assert_eq!(app.screen(), Screen::Dashboard);
        let second = app.dashboard().refresh();
        assert_ne!(first, second);
        let _ = app.update(Message::DeclineLoaded(second, Ok(mock::decline_summary(5, 45))));
        assert!(app.dashboard().gauge.is_running());
    }

    #[test]
    fn test_abandoned_refresh_responses_are_dropped() {
        let mut app = logged_in_app();
        let first = app.dashboard().refresh();

        // Leave mid-refresh and come back: the new refresh is in flight.
        let _ = app.update(Message::OpenSettings);
        let _ = app.update(Message::CloseSettings);
        let _ = app.update(Message::WeeklyLoaded(first, Ok(mock::weekly_summary())));
        let _ = app.update(Message::PreviewLoaded(first, Ok(mock::customer_page(0..3, 0, false))));
        let _ = app.update(Message::DeclineLoaded(first, Ok(mock::decline_summary(5, 45))));
        assert!(app.dashboard().is_loading());
        assert!(app.dashboard().weekly.is_none());
        assert!(app.dashboard().preview.is_empty());

        let second = app.dashboard().refresh();
        let _ = app.update(Message::WeeklyLoaded(second, Ok(mock::weekly_summary())));
        assert!(app.dashboard().weekly.is_some());
        assert!(app.dashboard().is_loading());
    }

    #[test]
    fn test_responses_after_logout_are_dropped() {
        let mut app = logged_in_app();
        let refresh = app.dashboard().refresh();
        let _ = app.update(Message::Logout);

        let _ = app.update(Message::WeeklyLoaded(refresh, Ok(mock::weekly_summary())));
        let _ = app.update(Message::PreviewLoaded(refresh, Ok(mock::customer_page(0..3, 0, false))));
        assert!(app.dashboard().weekly.is_none());
        assert!(app.dashboard().preview.is_empty());

        // A late rejection of the old session does not touch the login form.
        let _ = app.update(Message::DeclineLoaded(refresh, Err(session_expired())));
        assert_eq!(app.screen(), Screen::Login);
        assert!(app.login().error.is_none());
    }

    #[test]
    fn test_auth_failure_forces_logout() {
        let mut app = logged_in_app();
        let refresh = app.dashboard().refresh();
        let _ = app.update(Message::WeeklyLoaded(refresh, Err(session_expired())));
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(
            app.login().error.as_deref(),
            Some("Session expired, please log in again")
        );
        assert!(app.dashboard().weekly.is_none());
    }

    #[test]
    fn test_customer_paging_through_update() {
        let mut app = logged_in_app();
        let _ = app.update(Message::OpenCustomers(Segment::All));
        let _ = app.update(Message::CustomersLoaded {
            segment: Segment::All,
            page: 0,
            result: Ok(mock::customer_page(0..20, 0, true)),
        });
        assert_eq!(app.customers().customers.len(), 20);

        let _ = app.update(Message::ShowMore);
        assert_eq!(app.customers().loading, Some(1));

        // Segment switch while page 1 is in flight drops it.
        let _ = app.update(Message::SelectSegment(Segment::Loyal));
        let _ = app.update(Message::CustomersLoaded {
            segment: Segment::All,
            page: 1,
            result: Ok(mock::customer_page(20..40, 1, false)),
        });
        assert!(app.customers().customers.is_empty());
        assert_eq!(app.customers().segment, Segment::Loyal);
    }

    #[test]
    fn test_detail_returns_to_previous_screen() {
        let mut app = logged_in_app();
        let _ = app.update(Message::OpenCustomers(Segment::Loyal));
        let _ = app.update(Message::SelectCustomer(3));
        assert_eq!(app.screen(), Screen::CustomerDetail);

        let _ = app.update(Message::DetailLoaded(
            3,
            Ok(mock::customer_detail(3, "Kim Minji", true)),
        ));
        assert!(app.detail().and_then(|d| d.detail.as_ref()).is_some());
        assert_eq!(app.title(), "MokiSight - Kim Minji");

        let _ = app.update(Message::CloseDetail);
        assert_eq!(app.screen(), Screen::Customers);
        assert!(app.detail().is_none());
    }

    #[test]
    fn test_save_settings_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json5");

        let mut flags = demo_flags();
        flags.config_path = Some(path.clone());
        let (mut app, _) = MokiSight::new(flags);

        let _ = app.update(Message::OpenSettings);
        let _ = app.update(Message::SetBaseUrl("https://crm.example.com/api".to_string()));
        let _ = app.update(Message::SetTheme(AppTheme::Dark));
        let _ = app.update(Message::SaveSettings);

        let saved: AppConfig = mokisight_common::load_config(&path).unwrap();
        assert_eq!(saved.api.base_url, "https://crm.example.com/api");
        assert!(saved.ui.dark_mode);
        assert_eq!(app.theme(), Theme::Dark);
    }

    #[test]
    fn test_invalid_settings_are_not_saved() {
        let mut app = logged_in_app();
        let _ = app.update(Message::OpenSettings);
        let _ = app.update(Message::SetBaseUrl("localhost".to_string()));
        let _ = app.update(Message::SaveSettings);
        assert!(app.settings.error.is_some());
        assert_eq!(app.config.api.base_url, AppConfig::default().api.base_url);
    }
}
