pub mod types;
pub mod tuning;
