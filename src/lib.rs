pub mod analysis;
pub mod cli;
pub mod database;
pub mod decoding;
pub mod environment;
pub mod error;
pub mod job_extraction;
pub mod services;
pub mod utils;
pub mod web;

pub use environment::EnvironmentConfig;
pub use web::{build_rocket, start_web_server};
