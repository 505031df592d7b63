pub mod analyze;
pub mod completions;
pub mod config;
pub mod generate;
pub mod replay;
