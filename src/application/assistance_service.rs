use std::sync::Arc;

use crate::domain::assistance::{AssistanceKind, AssistanceRequest};
use crate::domain::errors::DomainError;
use crate::domain::ports::{AssistanceRepository, ClaimRepository, Notifier, Signal};

pub struct AssistanceService<A, C> {
    requests: A,
    claims: C,
    notifier: Arc<dyn Notifier>,
}

impl<A: AssistanceRepository, C: ClaimRepository> AssistanceService<A, C> {
    pub fn new(requests: A, claims: C, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            requests,
            claims,
            notifier,
        }
    }

    /// Files a request on behalf of the customer's claim.
    pub fn request(
        &self,
        customer_id: i32,
        kind: AssistanceKind,
        message: Option<&str>,
    ) -> Result<i32, DomainError> {
        let customer = self
            .claims
            .find_customer(customer_id)?
            .ok_or(DomainError::NotFound("Customer"))?;
        let claim = self
            .claims
            .find_claim(customer.table_claim_id)?
            .ok_or(DomainError::NotFound("Table claim"))?;

        let id = self.requests.create(claim.id, kind, message)?;
        log::info!("Assistance request {} ({}) on claim {}", id, kind, claim.id);
        self.notifier.notify(claim.id, Signal::Status);
        Ok(id)
    }

    pub fn list(&self, establishment_id: i32) -> Result<Vec<AssistanceRequest>, DomainError> {
        self.requests.list_visible(establishment_id)
    }

    pub fn dismiss(&self, id: i32) -> Result<(), DomainError> {
        let claim_id = self.requests.hide(id)?;
        log::info!("Assistance request {} dismissed", id);
        self.notifier.notify(claim_id, Signal::Status);
        Ok(())
    }
}
