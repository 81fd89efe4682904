//! View components for the MokiSight application.

pub mod chart;
pub mod components;
pub mod customer;
pub mod customers;
pub mod dashboard;
pub mod formatting;
pub mod login;
pub mod settings;
pub mod theme;
