//! # LMS Shared
//! 
//! Shared configuration, telemetry, types, and small utilities for the LMS server.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
