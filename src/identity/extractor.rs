use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};

use super::{Actor, EmployeeRole, JwtService};
use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Resolves the bearer token once per request; later extractors reuse the
/// actor cached in the request extensions.
fn authenticate(req: &HttpRequest) -> Result<Actor, AppError> {
    if let Some(actor) = req.extensions().get::<Actor>() {
        return Ok(*actor);
    }

    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| DomainError::Internal("token service is not configured".into()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .ok_or(DomainError::Unauthenticated)?;

    let actor = jwt.authenticate(token).map_err(|e| {
        log::debug!("Rejected token on {}: {}", req.path(), e);
        DomainError::Unauthenticated
    })?;

    req.extensions_mut().insert(actor);
    Ok(actor)
}

impl FromRequest for Actor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CustomerActor {
    pub customer_id: i32,
    pub claim_id: i32,
}

impl FromRequest for CustomerActor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|actor| match actor {
            Actor::Customer {
                customer_id,
                claim_id,
            } => Ok(CustomerActor {
                customer_id,
                claim_id,
            }),
            Actor::Employee { .. } => Err(DomainError::Forbidden("customers only").into()),
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EmployeeActor {
    pub employee_id: i32,
    pub role: EmployeeRole,
}

impl FromRequest for EmployeeActor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|actor| match actor {
            Actor::Employee { employee_id, role } => Ok(EmployeeActor { employee_id, role }),
            Actor::Customer { .. } => Err(DomainError::Forbidden("employees only").into()),
        }))
    }
}

/// An employee holding the administrator role.
#[derive(Debug, Clone, Copy)]
pub struct AdminActor {
    pub employee_id: i32,
}

impl FromRequest for AdminActor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|actor| match actor {
            Actor::Employee {
                employee_id,
                role: EmployeeRole::Administrator,
            } => Ok(AdminActor { employee_id }),
            _ => Err(DomainError::Forbidden("administrators only").into()),
        }))
    }
}
