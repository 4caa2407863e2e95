//! Per-graph dataset statistics computed in a single forward pass over the sorted index rows.
//!
//! Each region of a table is folded by its own [StatsScanner]. The partial counts of all regions
//! are summed by [merge_records] and written as a [VoID](https://www.w3.org/TR/void/) document.

mod counter;
mod error;
mod job;
mod merge;
mod scanner;
mod writer;

pub use counter::{GraphCounter, StatsGraph, StatsMetric, StatsRecord};
pub use error::StatsError;
pub use job::{compute_stats, root_graph_iri, StatsOptions};
pub use merge::merge_records;
pub use scanner::StatsScanner;
pub use writer::{OutputCompression, StatsTarget};
