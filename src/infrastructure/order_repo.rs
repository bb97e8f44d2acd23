use std::collections::HashMap;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::domain::claim::{ClaimStatus, CustomerView, TableClaim};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ActiveTableOrder, CustomerOrderStatus, CustomerOrderView, DateRange, PlacedOrder, PricedLine,
    TableOrderStatus, TableOrderView,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{customer_orders, customers, order_addons, table_claims, table_orders, tables};

use super::models::{
    CustomerOrderRow, CustomerRow, NewCustomerOrderRow, NewOrderAddonRow, NewTableOrderRow,
    OrderAddonRow, TableClaimRow, TableOrderRow, TableRow,
};
use super::DieselStore;

fn active_table_order_id(conn: &mut PgConnection, claim_id: i32) -> QueryResult<Option<i32>> {
    table_orders::table
        .filter(table_orders::table_claim_id.eq(claim_id))
        .filter(table_orders::status.eq(TableOrderStatus::Active.as_str()))
        .select(table_orders::id)
        .first(conn)
        .optional()
}

/// Attaches addons and owner names to a batch of order rows, keeping row order.
fn order_views(
    conn: &mut PgConnection,
    rows: Vec<CustomerOrderRow>,
) -> Result<Vec<CustomerOrderView>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let addons = OrderAddonRow::belonging_to(&rows)
        .select(OrderAddonRow::as_select())
        .order(order_addons::id.asc())
        .load(conn)?
        .grouped_by(&rows);

    let owner_ids: Vec<i32> = rows.iter().map(|r| r.owner_id).collect();
    let owners: HashMap<i32, String> = customers::table
        .filter(customers::id.eq_any(owner_ids))
        .select((customers::id, customers::display_name))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .collect();

    rows.into_iter()
        .zip(addons)
        .map(|(row, addons)| {
            let owner_name = owners.get(&row.owner_id).cloned().unwrap_or_default();
            row.into_view(owner_name, addons)
        })
        .collect()
}

fn table_order_view(
    conn: &mut PgConnection,
    row: TableOrderRow,
) -> Result<TableOrderView, DomainError> {
    let rows = customer_orders::table
        .filter(customer_orders::table_order_id.eq(row.id))
        .order((customer_orders::updated_at.desc(), customer_orders::id.desc()))
        .select(CustomerOrderRow::as_select())
        .load(conn)?;
    let orders = order_views(conn, rows)?;
    row.into_view(orders)
}

/// Bumps the table order's `updated_at` after activity on one of its orders
/// and returns the claim it belongs to.
fn touch_table_order(conn: &mut PgConnection, table_order_id: i32) -> Result<i32, DomainError> {
    diesel::update(table_orders::table.find(table_order_id))
        .set(table_orders::updated_at.eq(Utc::now()))
        .returning(table_orders::table_claim_id)
        .get_result(conn)
        .optional()?
        .ok_or(DomainError::NotFound("Table order"))
}

impl OrderRepository for DieselStore {
    fn place(
        &self,
        claim_id: i32,
        customer_id: i32,
        line: &PricedLine,
        comment: Option<&str>,
    ) -> Result<PlacedOrder, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. The claim must stay ACTIVE until we commit; closing it takes
            //    FOR UPDATE and waits for us.
            let active = table_claims::table
                .find(claim_id)
                .filter(table_claims::status.eq(ClaimStatus::Active.as_str()))
                .select(table_claims::id)
                .for_share()
                .first::<i32>(conn)
                .optional()?;
            if active.is_none() {
                return Err(DomainError::ClaimNotActive);
            }

            // 2. Find or create the claim's ACTIVE table order.
            let table_order_id = match active_table_order_id(conn, claim_id)? {
                Some(id) => id,
                None => {
                    diesel::insert_into(table_orders::table)
                        .values(&NewTableOrderRow {
                            table_claim_id: claim_id,
                            status: TableOrderStatus::Active.as_str(),
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)?;
                    active_table_order_id(conn, claim_id)?.ok_or_else(|| {
                        DomainError::Internal("active table order vanished".into())
                    })?
                }
            };

            // 3. Snapshot the priced line and its addons.
            let customer_order_id: i32 = diesel::insert_into(customer_orders::table)
                .values(&NewCustomerOrderRow {
                    table_order_id,
                    owner_id: customer_id,
                    dish_id: Some(line.dish_id),
                    title: &line.title,
                    status: CustomerOrderStatus::Created.as_str(),
                    comment,
                    price: &line.unit_price,
                    total_price: &line.total_price,
                    quantity: line.quantity,
                })
                .returning(customer_orders::id)
                .get_result(conn)?;

            if !line.addons.is_empty() {
                let addons: Vec<NewOrderAddonRow> = line
                    .addons
                    .iter()
                    .map(|a| NewOrderAddonRow {
                        customer_order_id,
                        title: &a.title,
                        price: &a.price,
                    })
                    .collect();
                diesel::insert_into(order_addons::table)
                    .values(&addons)
                    .execute(conn)?;
            }
            touch_table_order(conn, table_order_id)?;

            Ok(PlacedOrder {
                table_order_id,
                customer_order_id,
            })
        })
    }

    fn cancel_own(&self, customer_order_id: i32, customer_id: i32) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Single conditional UPDATE: a second cancel finds nothing to change.
            let table_order_id: i32 = diesel::update(
                customer_orders::table
                    .filter(customer_orders::id.eq(customer_order_id))
                    .filter(customer_orders::owner_id.eq(customer_id))
                    .filter(customer_orders::status.eq(CustomerOrderStatus::Created.as_str())),
            )
            .set((
                customer_orders::status.eq(CustomerOrderStatus::Cancelled.as_str()),
                customer_orders::updated_at.eq(Utc::now()),
            ))
            .returning(customer_orders::table_order_id)
            .get_result(conn)
            .optional()?
            .ok_or(DomainError::NotFound("Customer order"))?;

            touch_table_order(conn, table_order_id)
        })
    }

    fn update_status(
        &self,
        customer_order_id: i32,
        status: CustomerOrderStatus,
    ) -> Result<(CustomerOrderView, i32), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::update(customer_orders::table.find(customer_order_id))
                .set((
                    customer_orders::status.eq(status.as_str()),
                    customer_orders::updated_at.eq(Utc::now()),
                ))
                .returning(CustomerOrderRow::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Customer order"))?;
            let claim_id = touch_table_order(conn, row.table_order_id)?;
            let view = order_views(conn, vec![row])?
                .pop()
                .ok_or_else(|| DomainError::Internal("updated order vanished".into()))?;
            Ok((view, claim_id))
        })
    }

    fn table_order_for_claim(&self, claim_id: i32) -> Result<Option<TableOrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let active = table_orders::table
            .filter(table_orders::table_claim_id.eq(claim_id))
            .filter(table_orders::status.eq(TableOrderStatus::Active.as_str()))
            .select(TableOrderRow::as_select())
            .first(&mut conn)
            .optional()?;
        let row = match active {
            Some(row) => Some(row),
            None => table_orders::table
                .filter(table_orders::table_claim_id.eq(claim_id))
                .order((table_orders::created_at.desc(), table_orders::id.desc()))
                .select(TableOrderRow::as_select())
                .first(&mut conn)
                .optional()?,
        };

        row.map(|row| table_order_view(&mut conn, row)).transpose()
    }

    fn active_table_orders(&self, range: DateRange) -> Result<Vec<ActiveTableOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<(TableOrderRow, TableClaimRow, TableRow)> = table_orders::table
            .inner_join(table_claims::table.inner_join(tables::table))
            .filter(table_orders::status.eq(TableOrderStatus::Active.as_str()))
            .filter(table_orders::created_at.ge(range.from))
            .filter(table_orders::created_at.lt(range.to))
            .order((table_orders::updated_at.desc(), table_orders::id.desc()))
            .select((
                TableOrderRow::as_select(),
                TableClaimRow::as_select(),
                TableRow::as_select(),
            ))
            .load(&mut conn)?;

        let claim_ids: Vec<i32> = rows.iter().map(|(_, c, _)| c.id).collect();
        let mut members: HashMap<i32, Vec<CustomerView>> = HashMap::new();
        for row in customers::table
            .filter(customers::table_claim_id.eq_any(claim_ids))
            .order((customers::created_at.asc(), customers::id.asc()))
            .select(CustomerRow::as_select())
            .load(&mut conn)?
        {
            members
                .entry(row.table_claim_id)
                .or_default()
                .push(row.into());
        }

        rows.into_iter()
            .map(|(table_order, claim, table)| {
                let customers = members.remove(&claim.id).unwrap_or_default();
                Ok(ActiveTableOrder {
                    table_order: table_order_view(&mut conn, table_order)?,
                    claim: TableClaim::try_from(claim)?,
                    table: table.into(),
                    customers,
                })
            })
            .collect()
    }

    fn orders_for_claim(&self, claim_id: i32) -> Result<Vec<CustomerOrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = customer_orders::table
            .inner_join(table_orders::table)
            .filter(table_orders::table_claim_id.eq(claim_id))
            .order(customer_orders::id.asc())
            .select(CustomerOrderRow::as_select())
            .load(&mut conn)?;
        order_views(&mut conn, rows)
    }

    fn orders_of_customer(&self, customer_id: i32) -> Result<Vec<CustomerOrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = customer_orders::table
            .filter(customer_orders::owner_id.eq(customer_id))
            .order(customer_orders::id.asc())
            .select(CustomerOrderRow::as_select())
            .load(&mut conn)?;
        order_views(&mut conn, rows)
    }
}
