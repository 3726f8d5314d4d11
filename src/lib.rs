#![forbid(unsafe_code)]

pub mod aea;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod provision;
pub mod utils;
pub mod version;
