#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::CoordinatorConfig;
pub use error::{AppError, Result};
