pub mod assistance;
pub mod claim;
pub mod errors;
pub mod order;
pub mod ports;
