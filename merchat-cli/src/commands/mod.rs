//! CLI command implementations.

pub mod log;
pub mod report;
pub mod track;
