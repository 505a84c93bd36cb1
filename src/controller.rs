//! Orchestration.
//!
//! - `pipeline`: the sequential capture → inference → archive → aggregate → publish run.
//! - `controller_handler`: builds the production pipeline and status server from a [`Config`](crate::configuration::Config).

pub mod controller_handler;
pub mod pipeline;

pub use controller_handler::Controller;
pub use pipeline::{ImageRecord, Pipeline, PipelineDelays, PipelineReport};
