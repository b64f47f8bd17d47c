//! Pipeline entry points.
//!
//! - `collect`: Query every configured region and merge the results
//! - `simplify`: Project raw results into the simplified schema
//! - `run_pipeline`: Collect → Simplify → Write

pub mod collect;
pub mod run;
pub mod simplify;

pub use collect::collect;
pub use run::{RunSummary, exit_code, run_from_dir, run_pipeline, run_with_config};
pub use simplify::{simplify, simplify_item};
