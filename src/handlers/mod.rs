pub mod orders;
pub mod restaurants;
