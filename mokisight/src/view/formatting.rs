//! Shared formatting utilities for the MokiSight views.

use chrono::{Days, NaiveDate};

/// Format a won amount with thousands separators, e.g. "₩3,500,000".
pub fn format_won(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}₩{}", sign, group_thousands(amount.unsigned_abs()))
}

/// Format a won change with an explicit sign, e.g. "+₩200,000".
pub fn format_won_change(change: i64) -> String {
    if change > 0 {
        format!("+{}", format_won(change))
    } else {
        format_won(change)
    }
}

/// Format a count change with an explicit sign, e.g. "+12", "-3", "0".
pub fn format_count_change(change: i64) -> String {
    if change > 0 {
        format!("+{}", change)
    } else {
        change.to_string()
    }
}

/// Format a 0..1 rate as a whole percentage, e.g. 0.64 -> "64%".
pub fn format_rate(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

/// Format a 0..1 rate change in percentage points, e.g. 0.03 -> "+3.0%p".
pub fn format_rate_change(change: f64) -> String {
    let points = change * 100.0;
    if points > 0.0 {
        format!("+{:.1}%p", points)
    } else {
        format!("{:.1}%p", points)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Date of the last visit, `visit_day_ago` days before `base`, as "YYYY.MM.DD".
pub fn format_last_visit(visit_day_ago: u32, base: NaiveDate) -> String {
    base.checked_sub_days(Days::new(u64::from(visit_day_ago)))
        .map(|date| date.format("%Y.%m.%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Relative description of a visit, e.g. "today", "yesterday", "5 days ago".
pub fn format_days_ago(days: u32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        n => format!("{} days ago", n),
    }
}

/// Format a Korean phone number with dashes.
///
/// - 11-digit mobile numbers: "01012345678" -> "010-1234-5678"
/// - Seoul numbers: "0212345678" -> "02-1234-5678", "021234567" -> "02-123-4567"
/// - Other 10-digit numbers: "0311234567" -> "031-123-4567"
///
/// Anything else is returned unchanged.
pub fn format_phone_number(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == ' ')
    {
        return raw.to_string();
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let split = |a: usize, b: usize| {
        format!("{}-{}-{}", &digits[..a], &digits[a..a + b], &digits[a + b..])
    };

    match digits.len() {
        11 if digits.starts_with("01") => split(3, 4),
        10 if digits.starts_with("02") => split(2, 4),
        9 if digits.starts_with("02") => split(2, 3),
        10 if digits.starts_with('0') => split(3, 3),
        _ => raw.to_string(),
    }
}

/// Short month label for a "yyyy-MM" key, e.g. "2025-09" -> "Sep".
pub fn format_month_label(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map(|date| date.format("%b").to_string())
        .unwrap_or_else(|_| month.to_string())
}

/// Format a backend "yyyy-MM-dd" date as "MM.DD"; other input is kept as is.
pub fn format_short_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%m.%d").to_string())
        .unwrap_or_else(|_| date.to_string())
}
