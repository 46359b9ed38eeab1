#![allow(clippy::result_large_err)]

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod git;
pub mod jira;
pub mod logwork;
pub mod prompt;
pub mod resolve;
