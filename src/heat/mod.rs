pub mod aggregate;
pub mod exec;
pub mod fetch;
pub mod output;

pub use aggregate::compute_heat;
pub use exec::exec;
pub use fetch::{fetch_daily_counts, HeatSource};
pub use output::{output_heatmap, output_json, output_ndjson};
