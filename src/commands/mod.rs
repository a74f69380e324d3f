pub mod call;
pub mod config;
