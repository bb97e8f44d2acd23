use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::claim::{CustomerView, TableClaim, TableInfo};
use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerOrderStatus {
    Created,
    Preparing,
    Ready,
    Done,
    Cancelled,
}

impl CustomerOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerOrderStatus::Created => "CREATED",
            CustomerOrderStatus::Preparing => "PREPARING",
            CustomerOrderStatus::Ready => "READY",
            CustomerOrderStatus::Done => "DONE",
            CustomerOrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for CustomerOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(CustomerOrderStatus::Created),
            "PREPARING" => Ok(CustomerOrderStatus::Preparing),
            "READY" => Ok(CustomerOrderStatus::Ready),
            "DONE" => Ok(CustomerOrderStatus::Done),
            "CANCELLED" => Ok(CustomerOrderStatus::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOrderStatus {
    Active,
    Closed,
}

impl TableOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableOrderStatus::Active => "ACTIVE",
            TableOrderStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for TableOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(TableOrderStatus::Active),
            "CLOSED" => Ok(TableOrderStatus::Closed),
            other => Err(DomainError::Internal(format!(
                "unknown table order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DishPrice {
    pub id: i32,
    pub title: String,
    pub base_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OptionPrice {
    pub id: i32,
    pub title: String,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub claim_id: i32,
    pub dish_id: i32,
    pub option_ids: Vec<i32>,
    pub comment: Option<String>,
    pub quantity: i32,
    pub customer_id: i32,
}

/// Priced snapshot of one order line, taken at order time.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub dish_id: i32,
    pub title: String,
    pub unit_price: BigDecimal,
    pub addons: Vec<OrderAddonView>,
    pub quantity: i32,
    pub total_price: BigDecimal,
}

impl PricedLine {
    pub fn new(dish: &DishPrice, options: &[OptionPrice], quantity: i32) -> Self {
        Self {
            dish_id: dish.id,
            title: dish.title.clone(),
            unit_price: dish.base_price.clone(),
            addons: options
                .iter()
                .map(|o| OrderAddonView {
                    title: o.title.clone(),
                    price: o.price.clone(),
                })
                .collect(),
            quantity,
            total_price: unit_price_with_options(dish, options) * BigDecimal::from(quantity),
        }
    }
}

/// Dish base price plus every selected option, for a single portion.
pub fn unit_price_with_options(dish: &DishPrice, options: &[OptionPrice]) -> BigDecimal {
    options
        .iter()
        .fold(dish.base_price.clone(), |acc, o| acc + &o.price)
}

pub const MAX_QUANTITY: i32 = 999;

pub fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be at most {MAX_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Largest amount a `NUMERIC(10,2)` money column holds: 99,999,999.99.
pub fn max_money() -> BigDecimal {
    BigDecimal::from(100_000_000) - BigDecimal::new(1.into(), 2)
}

/// Rejects an order whose snapshot total would not fit the ledger.
pub fn validate_total(total: &BigDecimal) -> Result<(), DomainError> {
    if *total > max_money() {
        return Err(DomainError::InvalidInput(format!(
            "order total {total} exceeds the maximum of {}",
            max_money()
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub table_order_id: i32,
    pub customer_order_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderAddonView {
    pub title: String,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CustomerOrderView {
    pub id: i32,
    pub table_order_id: i32,
    pub title: String,
    pub status: CustomerOrderStatus,
    pub comment: Option<String>,
    pub price: BigDecimal,
    pub total_price: BigDecimal,
    pub quantity: i32,
    pub owner_id: i32,
    pub owner_name: String,
    pub addons: Vec<OrderAddonView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TableOrderView {
    pub id: i32,
    pub table_claim_id: i32,
    pub status: TableOrderStatus,
    pub created_at: DateTime<Utc>,
    /// Most recently updated first.
    pub orders: Vec<CustomerOrderView>,
}

#[derive(Debug, Clone)]
pub struct ActiveTableOrder {
    pub table_order: TableOrderView,
    pub claim: TableClaim,
    pub table: TableInfo,
    pub customers: Vec<CustomerView>,
}

impl ActiveTableOrder {
    /// Case-insensitive substring match on table name, order status or order title.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.table.display_name.to_lowercase().contains(&needle)
            || self.table_order.orders.iter().any(|o| {
                o.status.as_str().to_lowercase().contains(&needle)
                    || o.title.to_lowercase().contains(&needle)
            })
    }
}

/// Half-open `[from, to)` window on table-order creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn today() -> Self {
        Self::day_of(Utc::now())
    }

    pub fn day_of(instant: DateTime<Utc>) -> Self {
        let midnight = instant
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(instant);
        Self {
            from: midnight,
            to: midnight + Duration::days(1),
        }
    }

    /// Fills whichever bound is missing from today's window.
    pub fn resolve(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        let today = Self::today();
        Self {
            from: from.unwrap_or(today.from),
            to: to.unwrap_or(today.to),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Receipt {
    pub orders: Vec<CustomerOrderView>,
    pub total_price: BigDecimal,
}

impl Receipt {
    /// Drops cancelled orders and sums the rest.
    pub fn from_orders(orders: Vec<CustomerOrderView>) -> Self {
        let orders: Vec<_> = orders
            .into_iter()
            .filter(|o| o.status != CustomerOrderStatus::Cancelled)
            .collect();
        let total_price = orders
            .iter()
            .fold(BigDecimal::from(0), |acc, o| acc + &o.total_price);
        Self {
            orders,
            total_price,
        }
    }
}
