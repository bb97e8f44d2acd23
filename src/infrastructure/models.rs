use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::assistance::AssistanceRequest;
use crate::domain::claim::{CustomerView, TableClaim, TableInfo};
use crate::domain::errors::DomainError;
use crate::domain::order::{CustomerOrderView, OrderAddonView, TableOrderView};
use crate::schema::{
    assistance_requests, customer_orders, customers, order_addons, table_claims, table_orders,
    tables,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = tables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TableRow {
    pub id: i32,
    pub establishment_id: i32,
    pub display_name: String,
    pub number: Option<i32>,
    pub seats: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TableRow> for TableInfo {
    fn from(row: TableRow) -> Self {
        TableInfo {
            id: row.id,
            establishment_id: row.establishment_id,
            display_name: row.display_name,
            number: row.number,
            seats: row.seats,
            is_available: row.is_available,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = table_claims)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TableClaimRow {
    pub id: i32,
    pub table_id: i32,
    pub status: String,
    pub requests_enabled: bool,
    pub request_code: String,
    pub allow_seats_bypass: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TableClaimRow> for TableClaim {
    type Error = DomainError;

    fn try_from(row: TableClaimRow) -> Result<Self, Self::Error> {
        Ok(TableClaim {
            id: row.id,
            table_id: row.table_id,
            status: row.status.parse()?,
            requests_enabled: row.requests_enabled,
            request_code: row.request_code,
            allow_seats_bypass: row.allow_seats_bypass,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = table_claims)]
pub struct NewTableClaimRow<'a> {
    pub table_id: i32,
    pub status: &'a str,
    pub requests_enabled: bool,
    pub request_code: &'a str,
    pub allow_seats_bypass: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: i32,
    pub table_claim_id: i32,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for CustomerView {
    fn from(row: CustomerRow) -> Self {
        CustomerView {
            id: row.id,
            table_claim_id: row.table_claim_id,
            display_name: row.display_name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow<'a> {
    pub table_claim_id: i32,
    pub display_name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = table_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TableOrderRow {
    pub id: i32,
    pub table_claim_id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableOrderRow {
    pub fn into_view(self, orders: Vec<CustomerOrderView>) -> Result<TableOrderView, DomainError> {
        Ok(TableOrderView {
            id: self.id,
            table_claim_id: self.table_claim_id,
            status: self.status.parse()?,
            created_at: self.created_at,
            orders,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = table_orders)]
pub struct NewTableOrderRow<'a> {
    pub table_claim_id: i32,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customer_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerOrderRow {
    pub id: i32,
    pub table_order_id: i32,
    pub owner_id: i32,
    pub dish_id: Option<i32>,
    pub title: String,
    pub status: String,
    pub comment: Option<String>,
    pub price: BigDecimal,
    pub total_price: BigDecimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerOrderRow {
    pub fn into_view(
        self,
        owner_name: String,
        addons: Vec<OrderAddonRow>,
    ) -> Result<CustomerOrderView, DomainError> {
        Ok(CustomerOrderView {
            id: self.id,
            table_order_id: self.table_order_id,
            title: self.title,
            status: self.status.parse()?,
            comment: self.comment,
            price: self.price,
            total_price: self.total_price,
            quantity: self.quantity,
            owner_id: self.owner_id,
            owner_name,
            addons: addons
                .into_iter()
                .map(|a| OrderAddonView {
                    title: a.title,
                    price: a.price,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customer_orders)]
pub struct NewCustomerOrderRow<'a> {
    pub table_order_id: i32,
    pub owner_id: i32,
    pub dish_id: Option<i32>,
    pub title: &'a str,
    pub status: &'a str,
    pub comment: Option<&'a str>,
    pub price: &'a BigDecimal,
    pub total_price: &'a BigDecimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_addons)]
#[diesel(belongs_to(CustomerOrderRow, foreign_key = customer_order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderAddonRow {
    pub id: i32,
    pub customer_order_id: i32,
    pub title: String,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_addons)]
pub struct NewOrderAddonRow<'a> {
    pub customer_order_id: i32,
    pub title: &'a str,
    pub price: &'a BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = assistance_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssistanceRequestRow {
    pub id: i32,
    pub table_claim_id: i32,
    pub kind: String,
    pub message: Option<String>,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssistanceRequestRow {
    pub fn into_domain(
        self,
        table_id: i32,
        table_name: String,
    ) -> Result<AssistanceRequest, DomainError> {
        Ok(AssistanceRequest {
            id: self.id,
            table_claim_id: self.table_claim_id,
            kind: self.kind.parse()?,
            message: self.message,
            is_hidden: self.is_hidden,
            table_id,
            table_name,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = assistance_requests)]
pub struct NewAssistanceRequestRow<'a> {
    pub table_claim_id: i32,
    pub kind: &'a str,
    pub message: Option<&'a str>,
}
