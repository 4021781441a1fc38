pub mod analytics;
pub mod catalog;
pub mod errors;
pub mod filter;
pub mod order;
pub mod ports;
pub mod pricing;
