pub mod assistance;
pub mod claims;
pub mod health;
pub mod orders;
pub mod response;
