use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::claims::{ClaimResponse, CustomerResponse, TableResponse};
use super::response::{created, ok, ApiResponse};
use crate::application::order_service::Requester;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    validate_quantity, ActiveTableOrder, CustomerOrderStatus, CustomerOrderView, DateRange,
    OrderAddonView, PlaceOrder, Receipt, TableOrderView,
};
use crate::errors::AppError;
use crate::identity::{Actor, CustomerActor, EmployeeActor};
use crate::OrderApi;

/// Money is sent as a two-decimal string, e.g. "12.50".
fn money(value: &BigDecimal) -> String {
    value.with_scale(2).to_string()
}

fn default_quantity() -> i32 {
    1
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub dish_id: i32,
    #[serde(default)]
    pub option_ids: Vec<i32>,
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    /// Dish base price plus selected options, one portion.
    pub unit_price: String,
    pub quantity: i32,
    pub total_price: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Defaults to the claim carried by the caller's token.
    pub claim_id: Option<i32>,
    pub dish_id: i32,
    #[serde(default)]
    pub option_ids: Vec<i32>,
    pub comment: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub table_order_id: i32,
    pub customer_order_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableOrderRequest {
    /// Required for employees; customers default to their own claim.
    pub claim_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// CREATED, PREPARING, READY, DONE or CANCELLED
    pub status: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActiveOrdersRequest {
    /// Inclusive lower bound on table-order creation. Defaults to today 00:00 UTC.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound. Defaults to tomorrow 00:00 UTC.
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive match on table name, order status or dish title.
    pub query: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddonResponse {
    pub title: String,
    pub price: String,
}

impl From<OrderAddonView> for AddonResponse {
    fn from(a: OrderAddonView) -> Self {
        Self {
            title: a.title,
            price: money(&a.price),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrderResponse {
    pub id: i32,
    pub table_order_id: i32,
    pub title: String,
    pub status: String,
    pub comment: Option<String>,
    pub price: String,
    pub total_price: String,
    pub quantity: i32,
    pub owner_id: i32,
    pub owner_name: String,
    pub addons: Vec<AddonResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerOrderView> for CustomerOrderResponse {
    fn from(o: CustomerOrderView) -> Self {
        Self {
            id: o.id,
            table_order_id: o.table_order_id,
            title: o.title,
            status: o.status.to_string(),
            comment: o.comment,
            price: money(&o.price),
            total_price: money(&o.total_price),
            quantity: o.quantity,
            owner_id: o.owner_id,
            owner_name: o.owner_name,
            addons: o.addons.into_iter().map(Into::into).collect(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableOrderResponse {
    pub id: i32,
    pub table_claim_id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Most recently updated first.
    pub orders: Vec<CustomerOrderResponse>,
}

impl From<TableOrderView> for TableOrderResponse {
    fn from(t: TableOrderView) -> Self {
        Self {
            id: t.id,
            table_claim_id: t.table_claim_id,
            status: t.status.as_str().to_string(),
            created_at: t.created_at,
            orders: t.orders.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTableOrderResponse {
    pub table_order: TableOrderResponse,
    pub table_claim: ClaimResponse,
    pub table: TableResponse,
    pub customers: Vec<CustomerResponse>,
}

impl From<ActiveTableOrder> for ActiveTableOrderResponse {
    fn from(a: ActiveTableOrder) -> Self {
        Self {
            table_order: a.table_order.into(),
            table_claim: a.claim.into(),
            table: a.table.into(),
            customers: a.customers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub orders: Vec<CustomerOrderResponse>,
    pub total_price: String,
}

impl From<Receipt> for ReceiptResponse {
    fn from(r: Receipt) -> Self {
        Self {
            total_price: money(&r.total_price),
            orders: r.orders.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotalResponse {
    pub total_price: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/order/price
#[utoipa::path(
    post,
    path = "/api/order/price",
    request_body = PriceRequest,
    responses(
        (status = 200, description = "Price for the requested quantity", body = PriceResponse),
        (status = 400, description = "Quantity out of range or total too large"),
        (status = 404, description = "Dish or option missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn calculate_price(
    orders: web::Data<OrderApi>,
    _actor: Actor,
    body: web::Json<PriceRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    validate_quantity(body.quantity)?;

    let unit = web::block(move || orders.calculate_price(body.dish_id, &body.option_ids)).await??;
    let total = &unit * BigDecimal::from(body.quantity);
    Ok(ok(PriceResponse {
        unit_price: money(&unit),
        quantity: body.quantity,
        total_price: money(&total),
    }))
}

/// POST /api/order
///
/// Places one dish, with options, on the caller's table tab.
#[utoipa::path(
    post,
    path = "/api/order",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = PlaceOrderResponse),
        (status = 400, description = "Quantity out of range or total too large"),
        (status = 403, description = "Caller is not part of the claim"),
        (status = 404, description = "Dish or option missing"),
        (status = 409, description = "Claim is closed"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn place_order(
    orders: web::Data<OrderApi>,
    actor: CustomerActor,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let request = PlaceOrder {
        claim_id: body.claim_id.unwrap_or(actor.claim_id),
        dish_id: body.dish_id,
        option_ids: body.option_ids,
        comment: body.comment.filter(|c| !c.trim().is_empty()),
        quantity: body.quantity,
        customer_id: actor.customer_id,
    };

    let placed = web::block(move || orders.place_order(request)).await??;
    Ok(created(PlaceOrderResponse {
        table_order_id: placed.table_order_id,
        customer_order_id: placed.customer_order_id,
    }))
}

/// POST /api/order/table
///
/// The claim's current tab. `data` is absent when nothing was ordered yet.
#[utoipa::path(
    post,
    path = "/api/order/table",
    request_body = TableOrderRequest,
    responses(
        (status = 200, description = "Current table order", body = TableOrderResponse),
        (status = 400, description = "Employee did not name a claim"),
        (status = 403, description = "Customer is not part of the claim"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_table_order(
    orders: web::Data<OrderApi>,
    actor: Actor,
    body: web::Json<TableOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let requested = body.into_inner().claim_id;
    let (claim_id, requester) = match actor {
        Actor::Customer {
            customer_id,
            claim_id,
        } => (
            requested.unwrap_or(claim_id),
            Requester::Customer(customer_id),
        ),
        Actor::Employee { .. } => (
            requested.ok_or_else(|| DomainError::InvalidInput("claimId is required".into()))?,
            Requester::Employee,
        ),
    };

    let table_order = web::block(move || orders.get_table_order(claim_id, requester)).await??;
    Ok(match table_order {
        Some(t) => ok(TableOrderResponse::from(t)),
        None => HttpResponse::Ok().json(ApiResponse::message("No orders yet")),
    })
}

/// POST /api/order/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/order/{id}/cancel",
    params(("id" = i32, Path, description = "Customer order id")),
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 404, description = "No CREATED order of the caller with this id"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn cancel_order(
    orders: web::Data<OrderApi>,
    actor: CustomerActor,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    web::block(move || orders.cancel_own_order(order_id, actor.customer_id)).await??;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Order cancelled")))
}

/// POST /api/order/{id}/status
#[utoipa::path(
    post,
    path = "/api/order/{id}/status",
    params(("id" = i32, Path, description = "Customer order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = CustomerOrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn update_status(
    orders: web::Data<OrderApi>,
    _actor: EmployeeActor,
    path: web::Path<i32>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status: CustomerOrderStatus = body.status.trim().to_uppercase().parse()?;

    let order = web::block(move || orders.update_status(order_id, status)).await??;
    Ok(ok(CustomerOrderResponse::from(order)))
}

/// POST /api/order/active
///
/// Employee dashboard: every ACTIVE table order in the window.
#[utoipa::path(
    post,
    path = "/api/order/active",
    request_body = ActiveOrdersRequest,
    responses(
        (status = 200, description = "Active table orders", body = Vec<ActiveTableOrderResponse>),
        (status = 403, description = "Not an employee"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_active_orders(
    orders: web::Data<OrderApi>,
    _actor: EmployeeActor,
    body: Option<web::Json<ActiveOrdersRequest>>,
) -> Result<HttpResponse, AppError> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let range = DateRange::resolve(body.from, body.to);

    let active =
        web::block(move || orders.get_active_orders(range, body.query.as_deref())).await??;
    Ok(ok(active
        .into_iter()
        .map(ActiveTableOrderResponse::from)
        .collect::<Vec<_>>()))
}

/// GET /api/order/receipt/customer
///
/// The caller's own non-cancelled orders.
#[utoipa::path(
    get,
    path = "/api/order/receipt/customer",
    responses((status = 200, description = "Caller's receipt", body = ReceiptResponse)),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_customer_receipt(
    orders: web::Data<OrderApi>,
    actor: CustomerActor,
) -> Result<HttpResponse, AppError> {
    let receipt = web::block(move || orders.get_customer_receipt(actor.customer_id)).await??;
    Ok(ok(ReceiptResponse::from(receipt)))
}

/// GET /api/order/receipts
///
/// What the rest of the table ordered.
#[utoipa::path(
    get,
    path = "/api/order/receipts",
    responses((status = 200, description = "Table receipt without the caller", body = ReceiptResponse)),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_receipts(
    orders: web::Data<OrderApi>,
    actor: CustomerActor,
) -> Result<HttpResponse, AppError> {
    let receipt = web::block(move || orders.get_receipts(actor.customer_id, true)).await??;
    Ok(ok(ReceiptResponse::from(receipt)))
}

/// GET /api/order/receipt/total
#[utoipa::path(
    get,
    path = "/api/order/receipt/total",
    responses((status = 200, description = "Whole-table total", body = ReceiptTotalResponse)),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_receipt_total(
    orders: web::Data<OrderApi>,
    actor: CustomerActor,
) -> Result<HttpResponse, AppError> {
    let receipt = web::block(move || orders.get_receipts(actor.customer_id, false)).await??;
    Ok(ok(ReceiptTotalResponse {
        total_price: money(&receipt.total_price),
    }))
}
