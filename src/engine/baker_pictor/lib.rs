pub mod core;
pub mod hosts;
