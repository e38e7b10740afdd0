//! budgetcraft-core: batch-build budget workbooks from a master template
//!
//! For each raw `.xlsx` file in a source folder this library injects the
//! file's table into a fixed region of the template, hides every sheet not on
//! the keep-visible list, derives the output name from a template cell, and
//! saves the result as a macro-enabled workbook. Two plain-text logs make
//! reruns idempotent: a processed-file ledger and a property-register audit
//! log.

pub mod audit;
pub mod batch;
pub mod config;
pub mod ledger;
pub mod naming;
pub mod reader;
pub mod refs;
pub mod workbook;

use anyhow::Result;

pub use batch::{ItemOutcome, ItemRecord, RunReport, discover_sources, run_batch};
pub use config::BatchConfig;
pub use naming::CollisionPolicy;
pub use workbook::{UmyaWorkbookService, WorkbookService};

/// Run one batch pass against the production workbook backend
pub fn run(config: &BatchConfig) -> Result<RunReport> {
    let mut service = UmyaWorkbookService::new();
    run_batch(config, &mut service)
}
