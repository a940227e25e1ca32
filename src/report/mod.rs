//! PDF report generation.
//!
//! [`ReportEngine`] turns a [`serp_search::ResultSet`] into pages through
//! [`layout::Layout`], then [`pdf::encode`] serializes them.

pub mod document;
mod engine;
pub mod layout;
mod metrics;
pub mod pdf;
mod winansi;

pub use document::{Document, DrawOp, FontStyle, LinkArea, Page, RasterImage, Rgb};
pub use engine::{NO_RESULTS_MESSAGE, RenderedReport, ReportEngine, ReportOptions};

/// Title printed at the top of the first page unless configured otherwise.
pub const DEFAULT_TITLE: &str = "Google Custom Search";
