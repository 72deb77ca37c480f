//! Emergency department operations dashboard.
//!
//! Generates a synthetic table of ED visits and derives the figures a
//! dashboard renders for a date window and a zone / acuity / disposition
//! selection: KPI summaries, grouped aggregates, an hourly demand series and
//! the filtered visit table.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod telemetry;
