use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::errors::DomainError;

pub const REQUEST_CODE_LEN: usize = 6;
const REQUEST_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    Active,
    Closed,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Active => "ACTIVE",
            ClaimStatus::Closed => "CLOSED",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ClaimStatus::Active => ClaimStatus::Closed,
            ClaimStatus::Closed => ClaimStatus::Active,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ClaimStatus::Active),
            "CLOSED" => Ok(ClaimStatus::Closed),
            other => Err(DomainError::Internal(format!("unknown claim status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableInfo {
    pub id: i32,
    pub establishment_id: i32,
    pub display_name: String,
    pub number: Option<i32>,
    pub seats: i32,
    pub is_available: bool,
}

#[derive(Debug, Clone)]
pub struct TableClaim {
    pub id: i32,
    pub table_id: i32,
    pub status: ClaimStatus,
    pub requests_enabled: bool,
    pub request_code: String,
    pub allow_seats_bypass: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CustomerView {
    pub id: i32,
    pub table_claim_id: i32,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of evaluating whether one more customer may attach to a claim.
///
/// The read-only availability check reports it as-is; the join action turns
/// anything but `Admitted` into an error via [`Admission::into_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    NeedsCode,
    SeatsFull,
}

impl Admission {
    /// The gate is checked before capacity, and the seats bypass only lifts
    /// the capacity limit.
    pub fn evaluate(
        claim: &TableClaim,
        seats_taken: i64,
        seats: i32,
        request_code: Option<&str>,
    ) -> Self {
        if claim.requests_enabled && request_code != Some(claim.request_code.as_str()) {
            return Admission::NeedsCode;
        }
        if !claim.allow_seats_bypass && seats_taken >= i64::from(seats) {
            return Admission::SeatsFull;
        }
        Admission::Admitted
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Admission::Admitted => Ok(()),
            Admission::NeedsCode => Err(DomainError::InvalidCode),
            Admission::SeatsFull => Err(DomainError::SeatsExhausted),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Availability {
    pub table: TableInfo,
    pub claim_id: Option<i32>,
    pub seats_taken: i64,
    pub requests_enabled: bool,
    pub admission: Admission,
}

#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub claim: TableClaim,
    pub customer: CustomerView,
    pub created_claim: bool,
}

#[derive(Debug, Clone)]
pub struct JoinedCustomer {
    pub claim_id: i32,
    pub customer: CustomerView,
    pub access_token: String,
}

/// Claim seen from one of its customers. `owner_id` is derived on every read.
#[derive(Debug, Clone)]
pub struct ClaimedView {
    pub table: TableInfo,
    pub claim: TableClaim,
    pub customers: Vec<CustomerView>,
    pub owner_id: i32,
    pub is_owner: bool,
}

impl ClaimedView {
    pub fn build(
        table: TableInfo,
        claim: TableClaim,
        mut customers: Vec<CustomerView>,
        requester_id: i32,
    ) -> Result<Self, DomainError> {
        customers.sort_by_key(|c| (c.created_at, c.id));
        let owner_id = owner_of(&customers).ok_or(DomainError::NotFound("Customer"))?;
        Ok(Self {
            table,
            claim,
            customers,
            owner_id,
            is_owner: owner_id == requester_id,
        })
    }
}

/// First customer to join, by creation time then id.
pub fn owner_of(customers: &[CustomerView]) -> Option<i32> {
    customers
        .iter()
        .min_by_key(|c| (c.created_at, c.id))
        .map(|c| c.id)
}

pub fn generate_request_code() -> String {
    let mut rng = rand::thread_rng();
    (0..REQUEST_CODE_LEN)
        .map(|_| REQUEST_CODE_ALPHABET[rng.gen_range(0..REQUEST_CODE_ALPHABET.len())] as char)
        .collect()
}

pub const MAX_DISPLAY_NAME_LEN: usize = 128;

/// Trims the name and checks it is non-empty and fits the customers table.
pub fn validate_display_name(name: &str) -> Result<&str, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput(
            "display name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(DomainError::InvalidInput(format!(
            "display name must be at most {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(name)
}
