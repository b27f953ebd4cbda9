//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod generate;
mod output;
mod service;

pub use check::CheckReport;
pub use generate::{GenerateReport, GenerationResult, PreviewFile};
pub use output::{Report, TerminalOutput};
pub use service::ServiceSummary;
