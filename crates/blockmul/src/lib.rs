//! blockmul library: application logic for the block multiplication CLI.

pub mod app;
pub mod config;
pub mod errors;
pub mod input;
