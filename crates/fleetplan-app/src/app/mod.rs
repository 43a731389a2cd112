//! Use cases driven by the CLI

pub mod merge_service;
pub mod plan_service;
pub mod summary_service;

pub use merge_service::{default_merge_output, merge_stop_sequences, MergeOutcome};
pub use plan_service::{generate_plans, load_line_previews, write_plan, PlanRunReport, PLANS_DIR};
pub use summary_service::{
    spawn_summary, summarize_hubs, CancellationToken, SummaryEvent, SummaryReport,
};
