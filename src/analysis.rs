pub mod aggregator;
pub mod report;
pub mod types;

pub use aggregator::{aggregate, is_infected};
pub use report::{render_report, ReportRow};
pub use types::{HealthStatus, Verdict};
