//! Application layer - orchestration over the domain and ports.

mod dialog_engine;
mod dispatcher;
mod report;

pub use dialog_engine::DialogEngine;
pub use dispatcher::Dispatcher;
pub use report::{CategoryStats, GeneralStats, ReportBuilder};
