pub mod token;
pub mod field;
pub mod manager;
