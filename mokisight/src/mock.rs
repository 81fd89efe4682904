//! Mock backend data for testing.
//!
//! Builders for the records the backend returns, so views and update logic
//! can be exercised without a server.

use mokisight_common::{
    Analytics, ChurnRiskLevel, CustomerDetail, CustomerPage, CustomerSummary, DeclineSummary,
    MonthlyVisit, VisitInfo, WeeklySummary,
};

/// A customer list row.
pub fn customer(customer_id: u64, name: &str, visit_day_ago: u32) -> CustomerSummary {
    CustomerSummary {
        customer_id,
        name: name.to_string(),
        visit_day_ago,
        total_visit_count: 12,
        loyalty_score: 75,
    }
}

/// A page of numbered customers "Customer {id}".
pub fn customer_page(ids: std::ops::Range<u64>, page: u32, has_next: bool) -> CustomerPage {
    let customers: Vec<_> = ids
        .map(|id| customer(id, &format!("Customer {}", id), (id % 90) as u32))
        .collect();

    CustomerPage {
        size: customers.len() as u32,
        customers,
        page,
        has_next,
    }
}

/// A customer detail, with or without visit analytics.
pub fn customer_detail(customer_id: u64, name: &str, with_analytics: bool) -> CustomerDetail {
    CustomerDetail {
        customer_id,
        name: name.to_string(),
        phone_number: "01012345678".to_string(),
        total_spent: 350_000,
        loyalty_score: 82,
        churn_risk_level: ChurnRiskLevel::Medium,
        current_points: 3_500,
        visit: VisitInfo {
            total_visit_count: 24,
            visit_day_ago: 5,
        },
        analytics: with_analytics.then(|| Analytics {
            visit_frequency: ["2025-11", "2025-10", "2025-09"]
                .iter()
                .zip([2, 5, 3])
                .map(|(month, count)| MonthlyVisit {
                    month: month.to_string(),
                    count,
                })
                .collect(),
        }),
    }
}

/// Weekly figures for the week ending 2025-11-06.
pub fn weekly_summary() -> WeeklySummary {
    WeeklySummary {
        start_date: "2025-10-31".to_string(),
        end_date: "2025-11-06".to_string(),
        total_sales: 3_500_000,
        sales_change: 200_000,
        visited_customer_count: 120,
        customer_count_change: -4,
        revisit_rate: 0.64,
        revisit_rate_change: 0.03,
    }
}

/// Decline summary with the given ratio.
pub fn decline_summary(decline_count: u32, decline_ratio: i32) -> DeclineSummary {
    DeclineSummary {
        decline_count,
        decline_ratio,
    }
}
