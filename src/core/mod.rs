pub mod config;
pub mod engine;
pub mod errors;
pub mod identity;
pub mod menu;
pub mod orders;
pub mod party;
pub mod queue;
pub mod records;
pub mod reports;
pub mod staff;
pub mod store;
pub mod tables;
pub mod types;

#[cfg(test)]
mod tests;
