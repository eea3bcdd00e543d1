pub mod queue;
pub mod resolver;
