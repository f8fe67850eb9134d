pub mod asian;
pub mod paths;
