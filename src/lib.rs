//! serp-report: paged web search results rendered as a PDF report.
//!
//! A run searches once through [`serp_search`], optionally short-circuited
//! by the on-disk result cache, and lays the results out as numbered blocks
//! on A4 pages:
//!
//! Cache lookup → Aggregator → Cache store → Report engine → PDF file
//!
//! # Architecture
//!
//! - **Search**: [`serp_search::Aggregator`] over the Custom Search API
//! - **Thumbnails**: [`thumbnail::ThumbnailFetcher`] with a scoped
//!   temporary-file registry
//! - **Layout**: [`report::ReportEngine`] flows text through
//!   [`report::layout::Layout`] and encodes with [`report::pdf`]
//! - **Run**: [`pipeline::Pipeline`] ties the stages together and writes the
//!   file atomically

pub mod app_dirs;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod thumbnail;

pub use config::{AppConfig, SearchOverrides};
pub use error::{ReportError, Result};
pub use pipeline::{Pipeline, RunRequest, RunSummary};
pub use report::{ReportEngine, ReportOptions};
