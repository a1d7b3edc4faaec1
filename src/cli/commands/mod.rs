//! Command implementations

pub mod check;
pub mod completions;
pub mod edit;
pub mod fields;
pub mod fill;
pub mod init;
pub mod preview;
