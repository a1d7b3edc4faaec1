//! Core module - configuration and value helpers

pub mod config;
pub mod value;

pub use config::Config;
