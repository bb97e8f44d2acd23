use chrono::Utc;
use diesel::prelude::*;

use crate::domain::assistance::{AssistanceKind, AssistanceRequest};
use crate::domain::errors::DomainError;
use crate::domain::ports::AssistanceRepository;
use crate::schema::{assistance_requests, table_claims, tables};

use super::models::{AssistanceRequestRow, NewAssistanceRequestRow};
use super::DieselStore;

impl AssistanceRepository for DieselStore {
    fn create(
        &self,
        claim_id: i32,
        kind: AssistanceKind,
        message: Option<&str>,
    ) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;
        let id = diesel::insert_into(assistance_requests::table)
            .values(&NewAssistanceRequestRow {
                table_claim_id: claim_id,
                kind: kind.as_str(),
                message,
            })
            .returning(assistance_requests::id)
            .get_result(&mut conn)?;
        Ok(id)
    }

    fn list_visible(&self, establishment_id: i32) -> Result<Vec<AssistanceRequest>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<(AssistanceRequestRow, i32, String)> = assistance_requests::table
            .inner_join(table_claims::table.inner_join(tables::table))
            .filter(assistance_requests::is_hidden.eq(false))
            .filter(tables::establishment_id.eq(establishment_id))
            .order((
                assistance_requests::created_at.desc(),
                assistance_requests::id.desc(),
            ))
            .select((
                AssistanceRequestRow::as_select(),
                tables::id,
                tables::display_name,
            ))
            .load(&mut conn)?;

        rows.into_iter()
            .map(|(row, table_id, table_name)| row.into_domain(table_id, table_name))
            .collect()
    }

    fn hide(&self, id: i32) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;
        diesel::update(assistance_requests::table.find(id))
            .set((
                assistance_requests::is_hidden.eq(true),
                assistance_requests::updated_at.eq(Utc::now()),
            ))
            .returning(assistance_requests::table_claim_id)
            .get_result(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("Assistance request"))
    }
}
