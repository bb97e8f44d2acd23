//! Who is calling: token issuance and validation, plus the actix extractors
//! that gate handlers by actor kind and role.

pub mod extractor;
pub mod jwt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use extractor::{AdminActor, CustomerActor, EmployeeActor};
pub use jwt::{Claims, JwtError, JwtService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Customer,
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeRole {
    General,
    Waiter,
    Administrator,
    Receptionist,
    Kitchen,
    Other,
}

/// A caller resolved from a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Customer { customer_id: i32, claim_id: i32 },
    Employee { employee_id: i32, role: EmployeeRole },
}

impl TryFrom<Claims> for Actor {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id: i32 = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("malformed subject '{}'", claims.sub)))?;
        match claims.kind {
            ActorKind::Customer => {
                let claim_id = claims
                    .claim
                    .ok_or_else(|| JwtError::InvalidToken("customer token without claim".into()))?;
                Ok(Actor::Customer {
                    customer_id: id,
                    claim_id,
                })
            }
            ActorKind::Employee => Ok(Actor::Employee {
                employee_id: id,
                role: claims.role.unwrap_or(EmployeeRole::General),
            }),
        }
    }
}
