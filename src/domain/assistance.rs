use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistanceKind {
    Help,
    PayCash,
    PayCard,
    Other,
}

impl AssistanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistanceKind::Help => "HELP",
            AssistanceKind::PayCash => "PAYCASH",
            AssistanceKind::PayCard => "PAYCARD",
            AssistanceKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for AssistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssistanceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HELP" => Ok(AssistanceKind::Help),
            "PAYCASH" => Ok(AssistanceKind::PayCash),
            "PAYCARD" => Ok(AssistanceKind::PayCard),
            "OTHER" => Ok(AssistanceKind::Other),
            other => Err(DomainError::InvalidInput(format!(
                "unknown assistance type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistanceRequest {
    pub id: i32,
    pub table_claim_id: i32,
    pub kind: AssistanceKind,
    pub message: Option<String>,
    pub is_hidden: bool,
    pub table_id: i32,
    pub table_name: String,
    pub created_at: DateTime<Utc>,
}
