//! retention-core: cohort retention matrix from per-user daily activity.

pub mod cohort;
pub mod config;
pub mod error;
pub mod format;
pub mod ledger;
pub mod pipeline;
pub mod record;
pub mod types;
