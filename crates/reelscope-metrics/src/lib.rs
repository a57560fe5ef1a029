//! Normalization and metrics pipeline for scraped short-form video records.
//!
//! Raw records arrive as untyped JSON with several competing schemas. They are
//! normalized into [`VideoRecord`]s, assembled into a recency-ordered
//! [`VideoTable`], reduced to a [`MetricsSummary`] and finally projected into
//! the compact [`ReportRequest`] handed to the report generator.

pub mod error;
pub mod export;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod summary;
pub mod table;
pub mod types;

pub use error::ExportError;
pub use export::{write_table_csv, CsvRow};
pub use metrics::compute_metrics;
pub use normalize::normalize;
pub use pipeline::{analyze, Analysis};
pub use resolver::Field;
pub use summary::{project, CompactVideo, ReportRequest};
pub use table::build_table;
pub use types::{DerivedMetrics, MetricsSummary, VideoRecord, VideoTable};
