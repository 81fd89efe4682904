//! Data model of the CRM backend API.
//!
//! Field names follow the backend's snake_case JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer category used to filter list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Every customer of the store.
    #[default]
    All,
    /// Frequent, high-scoring customers.
    Loyal,
    /// Customers likely to stop visiting.
    ChurnRisk,
    /// Loyal customers whose visits are declining.
    AtRiskLoyal,
}

impl Segment {
    /// All segments, in tab order.
    pub const ALL: &'static [Segment] = &[
        Segment::All,
        Segment::Loyal,
        Segment::ChurnRisk,
        Segment::AtRiskLoyal,
    ];

    /// Value of the `segment` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::All => "all",
            Segment::Loyal => "loyal",
            Segment::ChurnRisk => "churn_risk",
            Segment::AtRiskLoyal => "at_risk_loyal",
        }
    }

    /// Human-readable tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Segment::All => "All customers",
            Segment::Loyal => "Loyal",
            Segment::ChurnRisk => "Churn risk",
            Segment::AtRiskLoyal => "At-risk loyal",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Segment::All),
            "loyal" => Ok(Segment::Loyal),
            "churn_risk" => Ok(Segment::ChurnRisk),
            "at_risk_loyal" => Ok(Segment::AtRiskLoyal),
            other => Err(format!("unknown segment: {}", other)),
        }
    }
}

/// One row of a customer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: u64,
    pub name: String,
    /// Days since the last visit.
    pub visit_day_ago: u32,
    pub total_visit_count: u32,
    /// Loyalty score, 0 to 100.
    pub loyalty_score: u32,
}

/// One page of a customer list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerPage {
    #[serde(default)]
    pub customers: Vec<CustomerSummary>,
    pub size: u32,
    /// Zero-based page index.
    pub page: u32,
    pub has_next: bool,
}

/// Churn risk classification assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChurnRiskLevel {
    High,
    Medium,
    Low,
    /// A level this client does not know about.
    Other(String),
}

impl ChurnRiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            ChurnRiskLevel::High => "HIGH",
            ChurnRiskLevel::Medium => "MEDIUM",
            ChurnRiskLevel::Low => "LOW",
            ChurnRiskLevel::Other(s) => s,
        }
    }
}

impl From<&str> for ChurnRiskLevel {
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "HIGH" => ChurnRiskLevel::High,
            "MEDIUM" => ChurnRiskLevel::Medium,
            "LOW" => ChurnRiskLevel::Low,
            _ => ChurnRiskLevel::Other(s.to_string()),
        }
    }
}

impl Serialize for ChurnRiskLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChurnRiskLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ChurnRiskLevel::from(s.as_str()))
    }
}

impl fmt::Display for ChurnRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visit counters of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisitInfo {
    pub total_visit_count: u32,
    pub visit_day_ago: u32,
}

/// Visits within one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyVisit {
    /// Month as "yyyy-MM".
    pub month: String,
    pub count: u32,
}

/// Analytics attached to a customer detail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub visit_frequency: Vec<MonthlyVisit>,
}

/// Full customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetail {
    pub customer_id: u64,
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Lifetime spend in won.
    pub total_spent: i64,
    pub loyalty_score: u32,
    pub churn_risk_level: ChurnRiskLevel,
    #[serde(default)]
    pub current_points: i64,
    #[serde(default)]
    pub visit: VisitInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Analytics>,
}

impl CustomerDetail {
    /// Monthly visit counts in chronological order.
    ///
    /// The backend returns the most recent month first.
    pub fn visit_frequency(&self) -> Vec<MonthlyVisit> {
        let mut months = self
            .analytics
            .as_ref()
            .map(|a| a.visit_frequency.clone())
            .unwrap_or_default();
        months.sort_by(|a, b| a.month.cmp(&b.month));
        months
    }
}

/// Store-wide figures for the current week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// First day of the week, "yyyy-MM-dd".
    pub start_date: String,
    /// Last day of the week, "yyyy-MM-dd".
    pub end_date: String,
    pub total_sales: i64,
    /// Change against the previous week.
    pub sales_change: i64,
    pub visited_customer_count: i64,
    pub customer_count_change: i64,
    /// Fraction of returning visitors, 0.0 to 1.0.
    pub revisit_rate: f64,
    pub revisit_rate_change: f64,
}

/// Loyal customers whose visits are declining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeclineSummary {
    pub decline_count: u32,
    /// Share of loyal customers that are declining, in percent.
    pub decline_ratio: i32,
}

/// Credentials sent to `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub business_number: String,
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Error payload returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}
