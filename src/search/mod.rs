pub mod executor;
pub mod results;
