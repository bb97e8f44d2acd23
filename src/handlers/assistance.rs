use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::response::{created, ok, ApiResponse};
use crate::domain::assistance::{AssistanceKind, AssistanceRequest};
use crate::errors::AppError;
use crate::identity::{CustomerActor, EmployeeActor};
use crate::AssistanceApi;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssistanceRequestBody {
    /// HELP, PAYCASH, PAYCARD or OTHER
    #[serde(rename = "type")]
    pub kind: String,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssistanceCreatedResponse {
    pub id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceResponse {
    pub id: i32,
    pub table_claim_id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: Option<String>,
    pub table_id: i32,
    pub table_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<AssistanceRequest> for AssistanceResponse {
    fn from(r: AssistanceRequest) -> Self {
        Self {
            id: r.id,
            table_claim_id: r.table_claim_id,
            kind: r.kind.to_string(),
            message: r.message,
            table_id: r.table_id,
            table_name: r.table_name,
            created_at: r.created_at,
        }
    }
}

/// POST /api/assistance
#[utoipa::path(
    post,
    path = "/api/assistance",
    request_body = AssistanceRequestBody,
    responses(
        (status = 201, description = "Request filed", body = AssistanceCreatedResponse),
        (status = 400, description = "Unknown request type"),
    ),
    security(("bearer_auth" = [])),
    tag = "assistance"
)]
pub async fn request_assistance(
    assistance: web::Data<AssistanceApi>,
    actor: CustomerActor,
    body: web::Json<AssistanceRequestBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let kind: AssistanceKind = body.kind.trim().to_uppercase().parse()?;
    let message = body.message.filter(|m| !m.trim().is_empty());

    let id = web::block(move || {
        assistance.request(actor.customer_id, kind, message.as_deref())
    })
    .await??;
    Ok(created(AssistanceCreatedResponse { id }))
}

/// GET /api/establishment/{eid}/assistance-requests
///
/// Visible requests of the establishment, newest first.
#[utoipa::path(
    get,
    path = "/api/establishment/{eid}/assistance-requests",
    params(("eid" = i32, Path, description = "Establishment id")),
    responses((status = 200, description = "Open requests", body = Vec<AssistanceResponse>)),
    security(("bearer_auth" = [])),
    tag = "assistance"
)]
pub async fn list_assistance(
    assistance: web::Data<AssistanceApi>,
    _actor: EmployeeActor,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let establishment_id = path.into_inner();
    let requests = web::block(move || assistance.list(establishment_id)).await??;
    Ok(ok(requests
        .into_iter()
        .map(AssistanceResponse::from)
        .collect::<Vec<_>>()))
}

/// POST /api/establishment/{eid}/assistance-requests/{id}/dismiss
#[utoipa::path(
    post,
    path = "/api/establishment/{eid}/assistance-requests/{id}/dismiss",
    params(
        ("eid" = i32, Path, description = "Establishment id"),
        ("id" = i32, Path, description = "Assistance request id"),
    ),
    responses(
        (status = 200, description = "Request hidden"),
        (status = 404, description = "Request missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "assistance"
)]
pub async fn dismiss_assistance(
    assistance: web::Data<AssistanceApi>,
    _actor: EmployeeActor,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (_, id) = path.into_inner();
    web::block(move || assistance.dismiss(id)).await??;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Request dismissed")))
}
