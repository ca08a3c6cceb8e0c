pub mod campaign;
pub mod deployment;
pub mod draft;
pub mod errors;
pub mod marketplace;
