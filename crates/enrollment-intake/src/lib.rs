//! Training enrollment intake: course catalog loading, applicant draft state, local validation and
//! multipart submission against the remote intake service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
