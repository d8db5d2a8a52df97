//! Thin web backend that walks Jira issue hierarchies, aggregates recent
//! worklogs and drives filter-based triage updates.

pub mod audit;
pub mod chart;
pub mod config;
pub mod routes;
pub mod service;
pub mod session;

pub use chart::{ChartRenderer, DisabledChart};
pub use config::AppConfig;
pub use routes::{router, AppState};
pub use session::{Session, SessionStore};
