pub mod orchestrator;
pub mod report;


// Re-export main types
pub use orchestrator::{OrchestratorError, SubmissionOrchestrator, TASK_PANICKED};
pub use report::{render_report, report_line, Report, REPORT_HEADER};
