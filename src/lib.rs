pub mod application;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod domain;
pub mod infrastructure;
pub mod startup;
#[cfg(test)] pub mod test_utils;
