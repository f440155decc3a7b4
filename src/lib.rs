pub mod config;
pub mod error;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod process;

pub use config::{OutputFormat, PipelineConfig, Source};
pub use error::PipelineError;
pub use merge::{merge_tables, MasterTable};
pub use pipeline::{run_pipeline, PipelineSummary};
