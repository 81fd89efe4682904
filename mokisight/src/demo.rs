//! Demo mode backend.
//!
//! Serves seeded, internally consistent store data so MokiSight can be
//! demonstrated without a running CRM backend.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Months, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mokisight_common::{
    Analytics, ChurnRiskLevel, CrmApi, CustomerDetail, CustomerPage, CustomerSummary,
    DeclineSummary, Error, LoginRequest, MonthlyVisit, Result, Segment, VisitInfo, WeeklySummary,
};

/// Seed used by `--demo`.
pub const DEFAULT_SEED: u64 = 0x4d4f_4b49;

const LOYAL_COUNT: u64 = 50;
const CHURN_RISK_COUNT: u64 = 50;
const AT_RISK_LOYAL_COUNT: u64 = 12;

/// Months of visit history per customer.
const HISTORY_MONTHS: u32 = 6;

const FAMILY_NAMES: &[&str] = &["Kim", "Lee", "Park", "Choi", "Jung", "Kang", "Cho", "Yoon"];
const GIVEN_NAMES: &[&str] = &[
    "Minji", "Seojun", "Jiwoo", "Hayoon", "Doyun", "Seoyeon", "Yejun", "Sua", "Jihu", "Eunwoo",
];

/// In-memory `CrmApi` with generated customers.
pub struct DemoBackend {
    /// Customers with the segment they were generated for, by id.
    customers: Vec<(Segment, CustomerSummary)>,
    details: HashMap<u64, CustomerDetail>,
    weekly: WeeklySummary,
    decline: DeclineSummary,
    token: RwLock<Option<String>>,
    /// Artificial delay per call.
    latency: Option<Duration>,
}

impl DemoBackend {
    /// Generate a store from `seed`, with visit dates relative to `base_date`.
    pub fn new(seed: u64, base_date: NaiveDate) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut customers = Vec::new();
        let mut next_id = 1;

        let groups = [
            (Segment::Loyal, LOYAL_COUNT),
            (Segment::ChurnRisk, CHURN_RISK_COUNT),
            (Segment::AtRiskLoyal, AT_RISK_LOYAL_COUNT),
        ];
        for (segment, count) in groups {
            for _ in 0..count {
                customers.push((segment, generate_summary(&mut rng, segment, next_id)));
                next_id += 1;
            }
        }

        let details = customers
            .iter()
            .map(|(_, summary)| {
                (
                    summary.customer_id,
                    generate_detail(&mut rng, summary, base_date),
                )
            })
            .collect();

        let loyal_total = LOYAL_COUNT + AT_RISK_LOYAL_COUNT;
        let decline = DeclineSummary {
            decline_count: AT_RISK_LOYAL_COUNT as u32,
            decline_ratio: (AT_RISK_LOYAL_COUNT as f64 * 100.0 / loyal_total as f64).round() as i32,
        };

        let weekly = generate_weekly(&mut rng, base_date);

        tracing::info!(
            seed,
            customers = customers.len(),
            decline_ratio = decline.decline_ratio,
            "Generated demo store"
        );

        Self {
            customers,
            details,
            weekly,
            decline,
            token: RwLock::new(None),
            latency: None,
        }
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of customers in `segment`.
    pub fn segment_len(&self, segment: Segment) -> usize {
        self.customers
            .iter()
            .filter(|(s, _)| segment == Segment::All || *s == segment)
            .count()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn require_token(&self) -> Result<()> {
        let token = self.token.read().map(|t| t.is_some()).unwrap_or(false);
        if token { Ok(()) } else { Err(Error::MissingToken) }
    }
}

fn generate_name(rng: &mut SmallRng) -> String {
    let family = FAMILY_NAMES[rng.random_range(0..FAMILY_NAMES.len())];
    let given = GIVEN_NAMES[rng.random_range(0..GIVEN_NAMES.len())];
    format!("{} {}", family, given)
}

fn generate_summary(rng: &mut SmallRng, segment: Segment, customer_id: u64) -> CustomerSummary {
    let (visit_day_ago, total_visit_count, loyalty_score) = match segment {
        Segment::Loyal => (
            rng.random_range(1..=30),
            rng.random_range(50..=100),
            rng.random_range(70..=100),
        ),
        Segment::ChurnRisk => (
            rng.random_range(60..=200),
            rng.random_range(1..=20),
            rng.random_range(0..50),
        ),
        Segment::AtRiskLoyal => (
            rng.random_range(30..=60),
            rng.random_range(40..=90),
            rng.random_range(60..=85),
        ),
        Segment::All => (
            rng.random_range(1..=200),
            rng.random_range(1..=100),
            rng.random_range(0..100),
        ),
    };

    CustomerSummary {
        customer_id,
        name: generate_name(rng),
        visit_day_ago,
        total_visit_count,
        loyalty_score,
    }
}

fn risk_level(visit_day_ago: u32) -> ChurnRiskLevel {
    match visit_day_ago {
        60.. => ChurnRiskLevel::High,
        30..60 => ChurnRiskLevel::Medium,
        _ => ChurnRiskLevel::Low,
    }
}

fn generate_detail(rng: &mut SmallRng, summary: &CustomerSummary, base_date: NaiveDate) -> CustomerDetail {
    let total_spent = i64::from(summary.total_visit_count) * rng.random_range(8_000..25_000);
    let phone_number = format!(
        "010{:04}{:04}",
        rng.random_range(0..10_000),
        rng.random_range(0..10_000)
    );

    // Most recent month first, as the backend sends it.
    let monthly_average = (summary.total_visit_count / 12).max(1);
    let recent_months = summary.visit_day_ago / 30;
    let visit_frequency = (0..HISTORY_MONTHS)
        .filter_map(|offset| {
            let month = base_date.checked_sub_months(Months::new(offset))?;
            let count = if offset < recent_months {
                0
            } else {
                rng.random_range(0..=monthly_average * 2)
            };
            Some(MonthlyVisit {
                month: month.format("%Y-%m").to_string(),
                count,
            })
        })
        .collect();

    CustomerDetail {
        customer_id: summary.customer_id,
        name: summary.name.clone(),
        phone_number,
        total_spent,
        loyalty_score: summary.loyalty_score,
        churn_risk_level: risk_level(summary.visit_day_ago),
        current_points: total_spent / 100,
        visit: VisitInfo {
            total_visit_count: summary.total_visit_count,
            visit_day_ago: summary.visit_day_ago,
        },
        analytics: Some(Analytics { visit_frequency }),
    }
}

fn generate_weekly(rng: &mut SmallRng, base_date: NaiveDate) -> WeeklySummary {
    let start = base_date.checked_sub_days(Days::new(6)).unwrap_or(base_date);
    WeeklySummary {
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: base_date.format("%Y-%m-%d").to_string(),
        total_sales: rng.random_range(2_000..6_000) * 1_000,
        sales_change: rng.random_range(-500..800) * 1_000,
        visited_customer_count: rng.random_range(80..200),
        customer_count_change: rng.random_range(-20..30),
        revisit_rate: f64::from(rng.random_range(40_u32..80)) / 100.0,
        revisit_rate_change: f64::from(rng.random_range(-5_i32..6)) / 100.0,
    }
}

#[async_trait]
impl CrmApi for DemoBackend {
    async fn login(&self, request: &LoginRequest) -> Result<String> {
        self.delay().await;

        if request.business_number.trim().is_empty() || request.password.is_empty() {
            return Err(Error::Api {
                status: 401,
                message: "Invalid business number or password".to_string(),
            });
        }

        tracing::info!(business_number = %request.business_number, "Demo login");
        Ok(format!("demo-{}", request.business_number.trim()))
    }

    async fn weekly_summary(&self) -> Result<WeeklySummary> {
        self.delay().await;
        self.require_token()?;
        Ok(self.weekly.clone())
    }

    async fn decline_summary(&self) -> Result<DeclineSummary> {
        self.delay().await;
        self.require_token()?;
        Ok(self.decline)
    }

    async fn customers(&self, segment: Segment, size: u32, page: u32) -> Result<CustomerPage> {
        self.delay().await;
        self.require_token()?;

        let size = size.max(1) as usize;
        let start = page as usize * size;
        let matching: Vec<_> = self
            .customers
            .iter()
            .filter(|(s, _)| segment == Segment::All || *s == segment)
            .map(|(_, summary)| summary)
            .collect();

        let customers: Vec<_> = matching.iter().skip(start).take(size).map(|c| (*c).clone()).collect();

        Ok(CustomerPage {
            has_next: start + customers.len() < matching.len(),
            customers,
            size: size as u32,
            page,
        })
    }

    async fn customer_detail(&self, customer_id: u64) -> Result<CustomerDetail> {
        self.delay().await;
        self.require_token()?;

        self.details
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| Error::Api {
                status: 404,
                message: format!("Customer {} not found", customer_id),
            })
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }
}
