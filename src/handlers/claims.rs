use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::response::{ok, ApiResponse};
use crate::domain::claim::{
    Admission, Availability, ClaimedView, CustomerView, JoinedCustomer, TableClaim, TableInfo,
};
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::identity::{Actor, AdminActor, CustomerActor, EmployeeActor, EmployeeRole};
use crate::ClaimApi;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub id: i32,
    pub establishment_id: i32,
    pub display_name: String,
    pub number: Option<i32>,
    pub seats: i32,
    pub is_available: bool,
}

impl From<TableInfo> for TableResponse {
    fn from(t: TableInfo) -> Self {
        Self {
            id: t.id,
            establishment_id: t.establishment_id,
            display_name: t.display_name,
            number: t.number,
            seats: t.seats,
            is_available: t.is_available,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: i32,
    pub table_id: i32,
    /// ACTIVE or CLOSED
    pub status: String,
    pub requests_enabled: bool,
    pub request_code: String,
    pub allow_seats_bypass: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TableClaim> for ClaimResponse {
    fn from(c: TableClaim) -> Self {
        Self {
            id: c.id,
            table_id: c.table_id,
            status: c.status.to_string(),
            requests_enabled: c.requests_enabled,
            request_code: c.request_code,
            allow_seats_bypass: c.allow_seats_bypass,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i32,
    pub table_claim_id: i32,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerView> for CustomerResponse {
    fn from(c: CustomerView) -> Self {
        Self {
            id: c.id,
            table_claim_id: c.table_claim_id,
            display_name: c.display_name,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdmissionState {
    Admitted,
    NeedsCode,
    SeatsFull,
}

impl From<Admission> for AdmissionState {
    fn from(a: Admission) -> Self {
        match a {
            Admission::Admitted => AdmissionState::Admitted,
            Admission::NeedsCode => AdmissionState::NeedsCode,
            Admission::SeatsFull => AdmissionState::SeatsFull,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub table: TableResponse,
    pub claim_id: Option<i32>,
    pub seats_taken: i64,
    pub requests_enabled: bool,
    pub admission: AdmissionState,
}

impl From<Availability> for AvailabilityResponse {
    fn from(a: Availability) -> Self {
        Self {
            table: a.table.into(),
            claim_id: a.claim_id,
            seats_taken: a.seats_taken,
            requests_enabled: a.requests_enabled,
            admission: a.admission.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub table_id: i32,
    pub display_name: String,
    /// Required only while the table's claim is gated.
    pub request_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub claim_id: i32,
    pub customer: CustomerResponse,
}

impl From<JoinedCustomer> for SignInResponse {
    fn from(j: JoinedCustomer) -> Self {
        Self {
            access_token: j.access_token,
            claim_id: j.claim_id,
            customer: j.customer.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedResponse {
    pub table: TableResponse,
    pub table_claim: ClaimResponse,
    pub customers: Vec<CustomerResponse>,
    /// First customer to join.
    pub owner_id: i32,
    pub is_owner: bool,
}

impl From<ClaimedView> for ClaimedResponse {
    fn from(v: ClaimedView) -> Self {
        Self {
            table: v.table.into(),
            table_claim: v.claim.into(),
            customers: v.customers.into_iter().map(Into::into).collect(),
            owner_id: v.owner_id,
            is_owner: v.is_owner,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// `customer` or `employee`
    pub kind: String,
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<EmployeeRole>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/establishment/{eid}/table/{id}/check-availability
///
/// Read-only admission preview. A required code or a full table comes back
/// as a warning rather than an error; the sign-in call enforces both.
#[utoipa::path(
    get,
    path = "/api/establishment/{eid}/table/{id}/check-availability",
    params(
        ("eid" = i32, Path, description = "Establishment id"),
        ("id" = i32, Path, description = "Table id"),
    ),
    responses(
        (status = 200, description = "Availability, possibly with a warning", body = AvailabilityResponse),
        (status = 404, description = "Table missing, unavailable or in another establishment"),
    ),
    tag = "claims"
)]
pub async fn check_availability(
    claims: web::Data<ClaimApi>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (establishment_id, table_id) = path.into_inner();
    let availability =
        web::block(move || claims.check_availability(establishment_id, table_id)).await??;

    let admission = availability.admission;
    let body = AvailabilityResponse::from(availability);
    Ok(match admission {
        Admission::Admitted => ok(body),
        Admission::NeedsCode => HttpResponse::Ok().json(ApiResponse::warning(
            "This table is private, ask the table owner for the code",
            body,
        )),
        Admission::SeatsFull => HttpResponse::Ok().json(ApiResponse::warning(
            DomainError::SeatsExhausted.to_string(),
            body,
        )),
    })
}

/// POST /api/establishment/{eid}/sign-in
///
/// Joins the table's active claim, opening one if the table is free, and
/// returns a customer access token.
#[utoipa::path(
    post,
    path = "/api/establishment/{eid}/sign-in",
    params(("eid" = i32, Path, description = "Establishment id")),
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Joined", body = SignInResponse),
        (status = 400, description = "Wrong code, no seats left, or name empty or too long"),
        (status = 404, description = "Table missing or unavailable"),
    ),
    tag = "claims"
)]
pub async fn sign_in(
    claims: web::Data<ClaimApi>,
    path: web::Path<i32>,
    body: web::Json<SignInRequest>,
) -> Result<HttpResponse, AppError> {
    let establishment_id = path.into_inner();
    let body = body.into_inner();

    let joined = web::block(move || {
        claims.join_or_create_claim(
            establishment_id,
            body.table_id,
            &body.display_name,
            body.request_code.as_deref(),
        )
    })
    .await??;

    Ok(ok(SignInResponse::from(joined)))
}

/// GET /api/user
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "The caller", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "claims"
)]
pub async fn current_user(
    claims: web::Data<ClaimApi>,
    actor: Actor,
) -> Result<HttpResponse, AppError> {
    let user = match actor {
        Actor::Customer { customer_id, .. } => {
            let customer = web::block(move || claims.customer(customer_id)).await??;
            UserResponse {
                kind: "customer".to_string(),
                id: customer.id,
                claim_id: Some(customer.table_claim_id),
                display_name: Some(customer.display_name),
                role: None,
            }
        }
        Actor::Employee { employee_id, role } => UserResponse {
            kind: "employee".to_string(),
            id: employee_id,
            claim_id: None,
            display_name: None,
            role: Some(role),
        },
    };
    Ok(ok(user))
}

/// GET /api/claimed
#[utoipa::path(
    get,
    path = "/api/claimed",
    responses(
        (status = 200, description = "Caller's claim, table and party", body = ClaimedResponse),
        (status = 404, description = "Customer or claim missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "claims"
)]
pub async fn get_claimed(
    claims: web::Data<ClaimApi>,
    actor: CustomerActor,
) -> Result<HttpResponse, AppError> {
    let view = web::block(move || claims.get_claimed(actor.customer_id)).await??;
    Ok(ok(ClaimedResponse::from(view)))
}

/// POST /api/toggle-access-requests
///
/// Gates or ungates the caller's claim. The request code is rotated either way.
#[utoipa::path(
    post,
    path = "/api/toggle-access-requests",
    responses(
        (status = 200, description = "Updated claim", body = ClaimResponse),
        (status = 404, description = "Customer or claim missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "claims"
)]
pub async fn toggle_access_requests(
    claims: web::Data<ClaimApi>,
    actor: CustomerActor,
) -> Result<HttpResponse, AppError> {
    let claim = web::block(move || claims.toggle_access_requests(actor.customer_id)).await??;
    Ok(ok(ClaimResponse::from(claim)))
}

/// POST /api/claim/{id}/toggle-seats-limit
#[utoipa::path(
    post,
    path = "/api/claim/{id}/toggle-seats-limit",
    params(("id" = i32, Path, description = "Table claim id")),
    responses(
        (status = 200, description = "Updated claim", body = ClaimResponse),
        (status = 403, description = "Not an employee"),
        (status = 404, description = "Claim missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "claims"
)]
pub async fn toggle_seats_limit(
    claims: web::Data<ClaimApi>,
    _actor: EmployeeActor,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let claim_id = path.into_inner();
    let claim = web::block(move || claims.toggle_seats_limit_bypass(claim_id)).await??;
    Ok(ok(ClaimResponse::from(claim)))
}

/// POST /api/order/table/{id}/toggle
///
/// Closes (or reopens) the claim behind a table order.
#[utoipa::path(
    post,
    path = "/api/order/table/{id}/toggle",
    params(("id" = i32, Path, description = "Table order id")),
    responses(
        (status = 200, description = "Updated claim", body = ClaimResponse),
        (status = 404, description = "Table order missing"),
        (status = 409, description = "Table already has another active claim"),
    ),
    security(("bearer_auth" = [])),
    tag = "claims"
)]
pub async fn toggle_table_order_claim(
    claims: web::Data<ClaimApi>,
    _actor: EmployeeActor,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let table_order_id = path.into_inner();
    let claim = web::block(move || claims.toggle_table_order_claim(table_order_id)).await??;
    Ok(ok(ClaimResponse::from(claim)))
}

/// POST /api/establishment/{eid}/table/{id}/toggle-availability
#[utoipa::path(
    post,
    path = "/api/establishment/{eid}/table/{id}/toggle-availability",
    params(
        ("eid" = i32, Path, description = "Establishment id"),
        ("id" = i32, Path, description = "Table id"),
    ),
    responses(
        (status = 200, description = "Updated table", body = TableResponse),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Table missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "claims"
)]
pub async fn toggle_availability(
    claims: web::Data<ClaimApi>,
    actor: AdminActor,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (establishment_id, table_id) = path.into_inner();
    let table =
        web::block(move || claims.toggle_availability(establishment_id, table_id)).await??;
    log::info!("Administrator {} toggled table {}", actor.employee_id, table.id);
    Ok(ok(TableResponse::from(table)))
}
