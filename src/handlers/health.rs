use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use diesel::sql_query;
use serde::Serialize;
use utoipa::ToSchema;

use super::response::ok;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::DbPool;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
}

/// GET /health
///
/// Liveness plus a round trip to the database.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 500, description = "Database unreachable"),
    ),
    tag = "health"
)]
pub async fn health(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    web::block(move || -> Result<(), DomainError> {
        let mut conn = pool.get()?;
        sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    })
    .await??;

    Ok(ok(HealthResponse {
        status: "ok".to_string(),
        database: true,
    }))
}
