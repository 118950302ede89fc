//! Recruiting-agency applicant tracking: job approval and candidate submission
//! workflows with a mandatory pre-submission screening gate.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
