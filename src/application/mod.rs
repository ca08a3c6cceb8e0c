pub mod agent;
pub mod deployment;
pub mod ports;
pub mod session;
pub mod watcher;
