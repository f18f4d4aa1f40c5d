//! Validation reports and their rendering.

pub mod formatter;
pub mod model;

pub use formatter::{format_report, ReportFormat};
pub use model::ValidationReport;
