pub mod check;
pub mod deps;
pub mod drafting;
pub mod enrichment;
pub mod generation;
pub mod ingest;
pub mod pipeline;
pub mod refinement;
pub mod scoring;
pub mod selector;
pub mod stats;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use deps::PipelineDeps;
pub use pipeline::run_pipeline;
pub use stats::{EnrichmentStats, GenerationStats, RunStats, SelectionStats};
