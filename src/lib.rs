pub mod analyzers;
pub mod charts;
pub mod config;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod observation;
pub mod output;
pub mod parser;
pub mod report;

pub use error::{ReportError, Result};
pub use observation::{Attribute, Observation};
