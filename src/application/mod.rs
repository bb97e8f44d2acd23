pub mod assistance_service;
pub mod claim_service;
pub mod order_service;

#[cfg(test)]
pub(crate) mod testing;
