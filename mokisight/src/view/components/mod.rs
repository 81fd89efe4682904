//! Reusable UI components.

pub mod gauge;
pub mod risk_badge;
pub mod score_bar;

pub use gauge::GaugeView;
pub use risk_badge::RiskBadge;
pub use score_bar::{ScoreBar, ScoreBand};
