//! Load, filter and aggregate CCEE electricity-consumption records.
//!
//! The crate stops at the presentation boundary: [`pipeline::DashboardView`]
//! carries everything a front end needs to draw the KPIs, charts and
//! summary table, and [`data::Selections`] is what its selectors produce.

pub mod aggregate;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod state;
pub mod summary;
