pub mod case_writer;
pub mod collector;
pub mod report;

pub use case_writer::CaseWriter;
pub use collector::{CaseCounter, Collector, ExtractionProgress, WrittenCase};
pub use report::{ConfigSnapshot, ExtractionReport, ExtractionSummary};
