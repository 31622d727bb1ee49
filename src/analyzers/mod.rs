//! Aggregations over parsed observations.
//!
//! [`ranking`] orders single observations by their death-to-case ratio,
//! [`averages`] folds observations into a per-region daily average of new
//! cases.

pub mod averages;
pub mod ranking;
pub mod utility;
