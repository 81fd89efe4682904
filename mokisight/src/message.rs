use std::time::Instant;

use mokisight_common::{CustomerDetail, CustomerPage, DeclineSummary, Segment, WeeklySummary};

use crate::app::AppTheme;

/// A failed backend call, in a form that can travel inside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// Message shown to the user.
    pub message: String,
    /// The session is no longer valid and the user must log in again.
    pub auth: bool,
}

impl From<mokisight_common::Error> for ApiFailure {
    fn from(error: mokisight_common::Error) -> Self {
        Self {
            auth: error.is_auth_error(),
            message: error.to_string(),
        }
    }
}

/// Result of a backend call carried by a message.
pub type ApiResult<T> = Result<T, ApiFailure>;

/// Messages for the MokiSight application.
#[derive(Debug, Clone)]
pub enum Message {
    // Login
    /// Business number input changed.
    SetBusinessNumber(String),

    /// Password input changed.
    SetPassword(String),

    /// User submitted the login form.
    SubmitLogin,

    /// Login request completed with a token.
    LoginFinished(ApiResult<String>),

    /// User logged out.
    Logout,

    // Dashboard
    /// Open the main dashboard.
    OpenDashboard,

    /// Reload dashboard data.
    RefreshDashboard,

    /// Weekly summary loaded, tagged with the dashboard refresh generation.
    WeeklyLoaded(u64, ApiResult<WeeklySummary>),

    /// Declining loyal customer summary loaded.
    DeclineLoaded(u64, ApiResult<DeclineSummary>),

    /// At-risk loyal preview loaded.
    PreviewLoaded(u64, ApiResult<CustomerPage>),

    /// Display frame while the gauge animates.
    GaugeFrame(Instant),

    // Customer list
    /// Open the customer list on a segment.
    OpenCustomers(Segment),

    /// User switched segment tab.
    SelectSegment(Segment),

    /// User asked for the next page.
    ShowMore,

    /// A page of customers loaded.
    CustomersLoaded {
        segment: Segment,
        page: u32,
        result: ApiResult<CustomerPage>,
    },

    // Customer detail
    /// User selected a customer.
    SelectCustomer(u64),

    /// Customer detail loaded.
    DetailLoaded(u64, ApiResult<CustomerDetail>),

    /// Leave the detail view.
    CloseDetail,

    // Settings
    /// Open the settings view.
    OpenSettings,

    /// Close the settings view.
    CloseSettings,

    /// Set API base URL.
    SetBaseUrl(String),

    /// Set theme.
    SetTheme(AppTheme),

    /// Save settings.
    SaveSettings,

    /// Reset settings to defaults.
    ResetSettings,
}
