//! MokiSight - CRM dashboard for small stores.
//!
//! This library exposes the core components for testing.

pub mod app;
pub mod demo;
pub mod gauge;
pub mod message;
pub mod mock;
pub mod subscription;
pub mod view;

// Re-export commonly used types
pub use app::{AppTheme, Flags, MokiSight, Screen};
pub use message::{ApiFailure, ApiResult, Message};
