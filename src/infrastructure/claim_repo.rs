use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::domain::claim::{
    Admission, ClaimStatus, CustomerView, JoinOutcome, TableClaim, TableInfo,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::ClaimRepository;
use crate::schema::{customers, table_claims, table_orders, tables};

use super::models::{CustomerRow, NewCustomerRow, NewTableClaimRow, TableClaimRow, TableRow};
use super::{is_unique_violation, DieselStore};

/// Row-locks the table's ACTIVE claim for the rest of the transaction.
fn lock_active_claim(
    conn: &mut PgConnection,
    table_id: i32,
) -> QueryResult<Option<TableClaimRow>> {
    table_claims::table
        .filter(table_claims::table_id.eq(table_id))
        .filter(table_claims::status.eq(ClaimStatus::Active.as_str()))
        .select(TableClaimRow::as_select())
        .for_update()
        .first(conn)
        .optional()
}

fn seats_taken(conn: &mut PgConnection, claim_id: i32) -> QueryResult<i64> {
    customers::table
        .filter(customers::table_claim_id.eq(claim_id))
        .count()
        .get_result(conn)
}

impl ClaimRepository for DieselStore {
    fn find_table(&self, table_id: i32) -> Result<Option<TableInfo>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = tables::table
            .find(table_id)
            .select(TableRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(TableInfo::from))
    }

    fn active_claim(&self, table_id: i32) -> Result<Option<(TableClaim, i64)>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = table_claims::table
            .filter(table_claims::table_id.eq(table_id))
            .filter(table_claims::status.eq(ClaimStatus::Active.as_str()))
            .select(TableClaimRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };
        let taken = seats_taken(&mut conn, row.id)?;
        Ok(Some((TableClaim::try_from(row)?, taken)))
    }

    fn join(
        &self,
        table: &TableInfo,
        display_name: &str,
        request_code: Option<&str>,
        new_claim_code: &str,
    ) -> Result<JoinOutcome, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Find or create the ACTIVE claim. A racing creator makes our
            //    insert a no-op; the partial unique index decides the winner.
            let (row, created_claim) = match lock_active_claim(conn, table.id)? {
                Some(row) => (row, false),
                None => {
                    let inserted = diesel::insert_into(table_claims::table)
                        .values(&NewTableClaimRow {
                            table_id: table.id,
                            status: ClaimStatus::Active.as_str(),
                            requests_enabled: false,
                            request_code: new_claim_code,
                            allow_seats_bypass: false,
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)?;
                    let row = lock_active_claim(conn, table.id)?
                        .ok_or_else(|| DomainError::Internal("active claim vanished".into()))?;
                    (row, inserted == 1)
                }
            };
            let claim = TableClaim::try_from(row)?;

            // 2. Gate an existing claim while holding its row lock, so two
            //    joiners can never both take the last seat.
            if !created_claim {
                let taken = seats_taken(conn, claim.id)?;
                Admission::evaluate(&claim, taken, table.seats, request_code).into_result()?;
            }

            // 3. Seat the customer.
            let customer = diesel::insert_into(customers::table)
                .values(&NewCustomerRow {
                    table_claim_id: claim.id,
                    display_name,
                })
                .returning(CustomerRow::as_returning())
                .get_result(conn)?;

            Ok(JoinOutcome {
                claim,
                customer: customer.into(),
                created_claim,
            })
        })
    }

    fn find_claim(&self, claim_id: i32) -> Result<Option<TableClaim>, DomainError> {
        let mut conn = self.pool.get()?;
        table_claims::table
            .find(claim_id)
            .select(TableClaimRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(TableClaim::try_from)
            .transpose()
    }

    fn find_customer(&self, customer_id: i32) -> Result<Option<CustomerView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = customers::table
            .find(customer_id)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(CustomerView::from))
    }

    fn claim_customers(&self, claim_id: i32) -> Result<Vec<CustomerView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = customers::table
            .filter(customers::table_claim_id.eq(claim_id))
            .order((customers::created_at.asc(), customers::id.asc()))
            .select(CustomerRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(CustomerView::from).collect())
    }

    fn toggle_requests(&self, claim_id: i32, new_code: &str) -> Result<TableClaim, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(table_claims::table.find(claim_id))
            .set((
                table_claims::requests_enabled.eq(diesel::dsl::not(table_claims::requests_enabled)),
                table_claims::request_code.eq(new_code),
                table_claims::updated_at.eq(Utc::now()),
            ))
            .returning(TableClaimRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("Table claim"))?;
        TableClaim::try_from(row)
    }

    fn toggle_seats_bypass(&self, claim_id: i32) -> Result<TableClaim, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(table_claims::table.find(claim_id))
            .set((
                table_claims::allow_seats_bypass
                    .eq(diesel::dsl::not(table_claims::allow_seats_bypass)),
                table_claims::updated_at.eq(Utc::now()),
            ))
            .returning(TableClaimRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("Table claim"))?;
        TableClaim::try_from(row)
    }

    fn toggle_claim_status(&self, table_order_id: i32) -> Result<TableClaim, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let claim_id: i32 = table_orders::table
                .find(table_order_id)
                .select(table_orders::table_claim_id)
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Table order"))?;

            let current = table_claims::table
                .find(claim_id)
                .select(TableClaimRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Table claim"))?;
            let next = TableClaim::try_from(current)?.status.toggled();

            let row = diesel::update(table_claims::table.find(claim_id))
                .set((
                    table_claims::status.eq(next.as_str()),
                    table_claims::updated_at.eq(Utc::now()),
                ))
                .returning(TableClaimRow::as_returning())
                .get_result(conn)
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        DomainError::Conflict("table already has an active claim")
                    } else {
                        e.into()
                    }
                })?;
            TableClaim::try_from(row)
        })
    }

    fn toggle_table_availability(&self, table_id: i32) -> Result<TableInfo, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(tables::table.find(table_id))
            .set((
                tables::is_available.eq(diesel::dsl::not(tables::is_available)),
                tables::updated_at.eq(Utc::now()),
            ))
            .returning(TableRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("Table"))?;
        Ok(row.into())
    }
}
