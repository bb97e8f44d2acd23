use std::sync::Arc;

use crate::domain::claim::{
    generate_request_code, Admission, Availability, ClaimedView, CustomerView, JoinedCustomer,
    validate_display_name, TableClaim, TableInfo,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::{ClaimRepository, Notifier, Signal, TokenIssuer};

/// Lifecycle of a table's occupancy session.
pub struct ClaimService<R> {
    repo: R,
    notifier: Arc<dyn Notifier>,
    tokens: Arc<dyn TokenIssuer>,
}

impl<R: ClaimRepository> ClaimService<R> {
    pub fn new(repo: R, notifier: Arc<dyn Notifier>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self {
            repo,
            notifier,
            tokens,
        }
    }

    /// Tables of another establishment and unavailable tables are reported
    /// the same way as missing ones.
    fn available_table(&self, establishment_id: i32, table_id: i32) -> Result<TableInfo, DomainError> {
        self.repo
            .find_table(table_id)?
            .filter(|t| t.establishment_id == establishment_id && t.is_available)
            .ok_or(DomainError::NotFound("Table"))
    }

    pub fn check_availability(
        &self,
        establishment_id: i32,
        table_id: i32,
    ) -> Result<Availability, DomainError> {
        let table = self.available_table(establishment_id, table_id)?;

        let Some((claim, seats_taken)) = self.repo.active_claim(table.id)? else {
            return Ok(Availability {
                table,
                claim_id: None,
                seats_taken: 0,
                requests_enabled: false,
                admission: Admission::Admitted,
            });
        };

        let admission = Admission::evaluate(&claim, seats_taken, table.seats, None);
        Ok(Availability {
            table,
            claim_id: Some(claim.id),
            seats_taken,
            requests_enabled: claim.requests_enabled,
            admission,
        })
    }

    pub fn join_or_create_claim(
        &self,
        establishment_id: i32,
        table_id: i32,
        display_name: &str,
        request_code: Option<&str>,
    ) -> Result<JoinedCustomer, DomainError> {
        let display_name = validate_display_name(display_name)?;
        let table = self.available_table(establishment_id, table_id)?;

        let outcome = self
            .repo
            .join(&table, display_name, request_code, &generate_request_code())?;
        if outcome.created_claim {
            log::info!("Table {} claimed, claim {} opened", table.id, outcome.claim.id);
        }
        log::info!(
            "Customer {} joined claim {}",
            outcome.customer.id,
            outcome.claim.id
        );

        let access_token = self
            .tokens
            .issue_customer_token(outcome.customer.id, outcome.claim.id)?;
        self.notifier.notify(outcome.claim.id, Signal::Joined);

        Ok(JoinedCustomer {
            claim_id: outcome.claim.id,
            customer: outcome.customer,
            access_token,
        })
    }

    /// Flips gating and always rotates the request code, so a code handed
    /// out earlier cannot be replayed once gating is turned back on.
    pub fn toggle_access_requests(&self, customer_id: i32) -> Result<TableClaim, DomainError> {
        let customer = self.customer(customer_id)?;
        let claim = self
            .repo
            .toggle_requests(customer.table_claim_id, &generate_request_code())?;
        log::info!(
            "Claim {} access requests {}",
            claim.id,
            if claim.requests_enabled { "enabled" } else { "disabled" }
        );
        self.notifier.notify(claim.id, Signal::Joined);
        Ok(claim)
    }

    pub fn toggle_seats_limit_bypass(&self, claim_id: i32) -> Result<TableClaim, DomainError> {
        let claim = self.repo.toggle_seats_bypass(claim_id)?;
        log::info!(
            "Claim {} seats bypass set to {}",
            claim.id,
            claim.allow_seats_bypass
        );
        self.notifier.notify(claim.id, Signal::Status);
        Ok(claim)
    }

    pub fn get_claimed(&self, customer_id: i32) -> Result<ClaimedView, DomainError> {
        let customer = self.customer(customer_id)?;
        let claim = self
            .repo
            .find_claim(customer.table_claim_id)?
            .ok_or(DomainError::NotFound("Table claim"))?;
        let table = self
            .repo
            .find_table(claim.table_id)?
            .ok_or(DomainError::NotFound("Table"))?;
        let customers = self.repo.claim_customers(claim.id)?;
        ClaimedView::build(table, claim, customers, customer.id)
    }

    /// Ends (or resumes) the session behind a table order.
    pub fn toggle_table_order_claim(&self, table_order_id: i32) -> Result<TableClaim, DomainError> {
        let claim = self.repo.toggle_claim_status(table_order_id)?;
        log::info!("Claim {} is now {}", claim.id, claim.status);
        self.notifier.notify(claim.id, Signal::Status);
        Ok(claim)
    }

    pub fn toggle_availability(
        &self,
        establishment_id: i32,
        table_id: i32,
    ) -> Result<TableInfo, DomainError> {
        self.repo
            .find_table(table_id)?
            .filter(|t| t.establishment_id == establishment_id)
            .ok_or(DomainError::NotFound("Table"))?;
        let table = self.repo.toggle_table_availability(table_id)?;
        log::info!("Table {} availability set to {}", table.id, table.is_available);
        Ok(table)
    }

    pub fn customer(&self, customer_id: i32) -> Result<CustomerView, DomainError> {
        self.repo
            .find_customer(customer_id)?
            .ok_or(DomainError::NotFound("Customer"))
    }
}
