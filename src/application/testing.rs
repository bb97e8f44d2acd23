//! In-memory port implementations for service tests.

use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::assistance::{AssistanceKind, AssistanceRequest};
use crate::domain::claim::{Admission, ClaimStatus, CustomerView, JoinOutcome, TableClaim, TableInfo};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ActiveTableOrder, CustomerOrderStatus, CustomerOrderView, DateRange, DishPrice, OptionPrice,
    PlacedOrder, PricedLine, TableOrderStatus, TableOrderView,
};
use crate::domain::ports::{
    AssistanceRepository, ClaimRepository, MenuCatalog, Notifier, OrderRepository, Signal,
    TokenIssuer,
};

#[derive(Debug, Clone)]
struct TableOrderRow {
    id: i32,
    claim_id: i32,
    status: TableOrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    next_id: i32,
    tick: i64,
    tables: Vec<TableInfo>,
    claims: Vec<TableClaim>,
    customers: Vec<CustomerView>,
    dishes: Vec<DishPrice>,
    options: Vec<(i32, OptionPrice)>,
    table_orders: Vec<TableOrderRow>,
    orders: Vec<CustomerOrderView>,
    assistance: Vec<AssistanceRequest>,
}

impl State {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps keep ordering deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(self.tick)
    }

    fn table_order_view(&self, row: &TableOrderRow) -> TableOrderView {
        let mut orders: Vec<_> = self
            .orders
            .iter()
            .filter(|o| o.table_order_id == row.id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        TableOrderView {
            id: row.id,
            table_claim_id: row.claim_id,
            status: row.status,
            created_at: row.created_at,
            orders,
        }
    }

    fn claim_of_table_order(&self, table_order_id: i32) -> Option<i32> {
        self.table_orders
            .iter()
            .find(|t| t.id == table_order_id)
            .map(|t| t.claim_id)
    }

    /// Marks activity on the table order and returns its claim.
    fn touch_table_order(&mut self, table_order_id: i32, now: DateTime<Utc>) -> Option<i32> {
        let row = self.table_orders.iter_mut().find(|t| t.id == table_order_id)?;
        row.updated_at = now;
        Some(row.claim_id)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("state lock poisoned")
    }

    pub fn add_table(&self, establishment_id: i32, display_name: &str, seats: i32) -> TableInfo {
        let mut state = self.lock();
        let table = TableInfo {
            id: state.id(),
            establishment_id,
            display_name: display_name.to_string(),
            number: None,
            seats,
            is_available: true,
        };
        state.tables.push(table.clone());
        table
    }

    pub fn add_dish(&self, title: &str, base_price: &str) -> i32 {
        let mut state = self.lock();
        let id = state.id();
        state.dishes.push(DishPrice {
            id,
            title: title.to_string(),
            base_price: base_price.parse().expect("valid decimal"),
        });
        id
    }

    pub fn add_option(&self, dish_id: i32, title: &str, price: &str) -> i32 {
        let mut state = self.lock();
        let id = state.id();
        state.options.push((
            dish_id,
            OptionPrice {
                id,
                title: title.to_string(),
                price: price.parse().expect("valid decimal"),
            },
        ));
        id
    }

    pub fn set_dish_price(&self, dish_id: i32, base_price: &str) {
        let mut state = self.lock();
        if let Some(dish) = state.dishes.iter_mut().find(|d| d.id == dish_id) {
            dish.base_price = base_price.parse().expect("valid decimal");
        }
    }

    pub fn claims_for_table(&self, table_id: i32) -> Vec<TableClaim> {
        self.lock()
            .claims
            .iter()
            .filter(|c| c.table_id == table_id)
            .cloned()
            .collect()
    }

    pub fn customer_count(&self, claim_id: i32) -> usize {
        self.lock()
            .customers
            .iter()
            .filter(|c| c.table_claim_id == claim_id)
            .count()
    }

    pub fn active_table_order_count(&self, claim_id: i32) -> usize {
        self.lock()
            .table_orders
            .iter()
            .filter(|t| t.claim_id == claim_id && t.status == TableOrderStatus::Active)
            .count()
    }

    pub fn order(&self, id: i32) -> Option<CustomerOrderView> {
        self.lock().orders.iter().find(|o| o.id == id).cloned()
    }
}

impl ClaimRepository for InMemoryStore {
    fn find_table(&self, table_id: i32) -> Result<Option<TableInfo>, DomainError> {
        Ok(self.lock().tables.iter().find(|t| t.id == table_id).cloned())
    }

    fn active_claim(&self, table_id: i32) -> Result<Option<(TableClaim, i64)>, DomainError> {
        let state = self.lock();
        Ok(state
            .claims
            .iter()
            .find(|c| c.table_id == table_id && c.status == ClaimStatus::Active)
            .map(|c| {
                let seats = state
                    .customers
                    .iter()
                    .filter(|m| m.table_claim_id == c.id)
                    .count() as i64;
                (c.clone(), seats)
            }))
    }

    fn join(
        &self,
        table: &TableInfo,
        display_name: &str,
        request_code: Option<&str>,
        new_claim_code: &str,
    ) -> Result<JoinOutcome, DomainError> {
        let mut state = self.lock();
        let existing = state
            .claims
            .iter()
            .find(|c| c.table_id == table.id && c.status == ClaimStatus::Active)
            .cloned();

        let (claim, created_claim) = match existing {
            Some(claim) => {
                let seats_taken = state
                    .customers
                    .iter()
                    .filter(|m| m.table_claim_id == claim.id)
                    .count() as i64;
                Admission::evaluate(&claim, seats_taken, table.seats, request_code)
                    .into_result()?;
                (claim, false)
            }
            None => {
                let now = state.now();
                let claim = TableClaim {
                    id: state.id(),
                    table_id: table.id,
                    status: ClaimStatus::Active,
                    requests_enabled: false,
                    request_code: new_claim_code.to_string(),
                    allow_seats_bypass: false,
                    created_at: now,
                    updated_at: now,
                };
                state.claims.push(claim.clone());
                (claim, true)
            }
        };

        let customer = CustomerView {
            id: state.id(),
            table_claim_id: claim.id,
            display_name: display_name.to_string(),
            created_at: state.now(),
        };
        state.customers.push(customer.clone());

        Ok(JoinOutcome {
            claim,
            customer,
            created_claim,
        })
    }

    fn find_claim(&self, claim_id: i32) -> Result<Option<TableClaim>, DomainError> {
        Ok(self.lock().claims.iter().find(|c| c.id == claim_id).cloned())
    }

    fn find_customer(&self, customer_id: i32) -> Result<Option<CustomerView>, DomainError> {
        Ok(self
            .lock()
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .cloned())
    }

    fn claim_customers(&self, claim_id: i32) -> Result<Vec<CustomerView>, DomainError> {
        let mut customers: Vec<_> = self
            .lock()
            .customers
            .iter()
            .filter(|c| c.table_claim_id == claim_id)
            .cloned()
            .collect();
        customers.sort_by_key(|c| (c.created_at, c.id));
        Ok(customers)
    }

    fn toggle_requests(&self, claim_id: i32, new_code: &str) -> Result<TableClaim, DomainError> {
        let mut state = self.lock();
        let now = state.now();
        let claim = state
            .claims
            .iter_mut()
            .find(|c| c.id == claim_id)
            .ok_or(DomainError::NotFound("Table claim"))?;
        claim.requests_enabled = !claim.requests_enabled;
        claim.request_code = new_code.to_string();
        claim.updated_at = now;
        Ok(claim.clone())
    }

    fn toggle_seats_bypass(&self, claim_id: i32) -> Result<TableClaim, DomainError> {
        let mut state = self.lock();
        let now = state.now();
        let claim = state
            .claims
            .iter_mut()
            .find(|c| c.id == claim_id)
            .ok_or(DomainError::NotFound("Table claim"))?;
        claim.allow_seats_bypass = !claim.allow_seats_bypass;
        claim.updated_at = now;
        Ok(claim.clone())
    }

    fn toggle_claim_status(&self, table_order_id: i32) -> Result<TableClaim, DomainError> {
        let mut state = self.lock();
        let claim_id = state
            .claim_of_table_order(table_order_id)
            .ok_or(DomainError::NotFound("Table order"))?;
        let claim = state
            .claims
            .iter()
            .find(|c| c.id == claim_id)
            .cloned()
            .ok_or(DomainError::NotFound("Table claim"))?;
        let next = claim.status.toggled();
        if next == ClaimStatus::Active
            && state.claims.iter().any(|c| {
                c.table_id == claim.table_id && c.status == ClaimStatus::Active && c.id != claim.id
            })
        {
            return Err(DomainError::Conflict("table already has an active claim"));
        }
        let now = state.now();
        let claim = state
            .claims
            .iter_mut()
            .find(|c| c.id == claim_id)
            .ok_or(DomainError::NotFound("Table claim"))?;
        claim.status = next;
        claim.updated_at = now;
        Ok(claim.clone())
    }

    fn toggle_table_availability(&self, table_id: i32) -> Result<TableInfo, DomainError> {
        let mut state = self.lock();
        let table = state
            .tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or(DomainError::NotFound("Table"))?;
        table.is_available = !table.is_available;
        Ok(table.clone())
    }
}

impl MenuCatalog for InMemoryStore {
    fn find_dish(&self, dish_id: i32) -> Result<Option<DishPrice>, DomainError> {
        Ok(self.lock().dishes.iter().find(|d| d.id == dish_id).cloned())
    }

    fn find_options(
        &self,
        dish_id: i32,
        option_ids: &[i32],
    ) -> Result<Vec<OptionPrice>, DomainError> {
        Ok(self
            .lock()
            .options
            .iter()
            .filter(|(d, o)| *d == dish_id && option_ids.contains(&o.id))
            .map(|(_, o)| o.clone())
            .collect())
    }
}

impl OrderRepository for InMemoryStore {
    fn place(
        &self,
        claim_id: i32,
        customer_id: i32,
        line: &PricedLine,
        comment: Option<&str>,
    ) -> Result<PlacedOrder, DomainError> {
        let mut state = self.lock();
        if !state
            .claims
            .iter()
            .any(|c| c.id == claim_id && c.status == ClaimStatus::Active)
        {
            return Err(DomainError::ClaimNotActive);
        }

        let table_order_id = match state
            .table_orders
            .iter()
            .find(|t| t.claim_id == claim_id && t.status == TableOrderStatus::Active)
        {
            Some(t) => t.id,
            None => {
                let now = state.now();
                let row = TableOrderRow {
                    id: state.id(),
                    claim_id,
                    status: TableOrderStatus::Active,
                    created_at: now,
                    updated_at: now,
                };
                state.table_orders.push(row.clone());
                row.id
            }
        };

        let owner_name = state
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .map(|c| c.display_name.clone())
            .ok_or(DomainError::NotFound("Customer"))?;
        let now = state.now();
        let order = CustomerOrderView {
            id: state.id(),
            table_order_id,
            title: line.title.clone(),
            status: CustomerOrderStatus::Created,
            comment: comment.map(str::to_string),
            price: line.unit_price.clone(),
            total_price: line.total_price.clone(),
            quantity: line.quantity,
            owner_id: customer_id,
            owner_name,
            addons: line.addons.clone(),
            created_at: now,
            updated_at: now,
        };
        let customer_order_id = order.id;
        state.orders.push(order);
        state.touch_table_order(table_order_id, now);

        Ok(PlacedOrder {
            table_order_id,
            customer_order_id,
        })
    }

    fn cancel_own(&self, customer_order_id: i32, customer_id: i32) -> Result<i32, DomainError> {
        let mut state = self.lock();
        let now = state.now();
        let order = state
            .orders
            .iter_mut()
            .find(|o| {
                o.id == customer_order_id
                    && o.owner_id == customer_id
                    && o.status == CustomerOrderStatus::Created
            })
            .ok_or(DomainError::NotFound("Customer order"))?;
        order.status = CustomerOrderStatus::Cancelled;
        order.updated_at = now;
        let table_order_id = order.table_order_id;
        state
            .touch_table_order(table_order_id, now)
            .ok_or(DomainError::NotFound("Table order"))
    }

    fn update_status(
        &self,
        customer_order_id: i32,
        status: CustomerOrderStatus,
    ) -> Result<(CustomerOrderView, i32), DomainError> {
        let mut state = self.lock();
        let now = state.now();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == customer_order_id)
            .ok_or(DomainError::NotFound("Customer order"))?;
        order.status = status;
        order.updated_at = now;
        let order = order.clone();
        let claim_id = state
            .touch_table_order(order.table_order_id, now)
            .ok_or(DomainError::NotFound("Table order"))?;
        Ok((order, claim_id))
    }

    fn table_order_for_claim(&self, claim_id: i32) -> Result<Option<TableOrderView>, DomainError> {
        let state = self.lock();
        let row = state
            .table_orders
            .iter()
            .filter(|t| t.claim_id == claim_id)
            .max_by_key(|t| (t.status == TableOrderStatus::Active, t.created_at, t.id));
        Ok(row.map(|r| state.table_order_view(r)))
    }

    fn active_table_orders(&self, range: DateRange) -> Result<Vec<ActiveTableOrder>, DomainError> {
        let state = self.lock();
        let mut rows: Vec<_> = state
            .table_orders
            .iter()
            .filter(|t| {
                t.status == TableOrderStatus::Active
                    && t.created_at >= range.from
                    && t.created_at < range.to
            })
            .collect();
        rows.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));

        let mut result = Vec::new();
        for row in rows {
            let claim = state
                .claims
                .iter()
                .find(|c| c.id == row.claim_id)
                .cloned()
                .ok_or(DomainError::NotFound("Table claim"))?;
            let table = state
                .tables
                .iter()
                .find(|t| t.id == claim.table_id)
                .cloned()
                .ok_or(DomainError::NotFound("Table"))?;
            let customers = state
                .customers
                .iter()
                .filter(|c| c.table_claim_id == claim.id)
                .cloned()
                .collect();
            result.push(ActiveTableOrder {
                table_order: state.table_order_view(row),
                claim,
                table,
                customers,
            });
        }
        Ok(result)
    }

    fn orders_for_claim(&self, claim_id: i32) -> Result<Vec<CustomerOrderView>, DomainError> {
        let state = self.lock();
        Ok(state
            .orders
            .iter()
            .filter(|o| state.claim_of_table_order(o.table_order_id) == Some(claim_id))
            .cloned()
            .collect())
    }

    fn orders_of_customer(&self, customer_id: i32) -> Result<Vec<CustomerOrderView>, DomainError> {
        Ok(self
            .lock()
            .orders
            .iter()
            .filter(|o| o.owner_id == customer_id)
            .cloned()
            .collect())
    }
}

impl AssistanceRepository for InMemoryStore {
    fn create(
        &self,
        claim_id: i32,
        kind: AssistanceKind,
        message: Option<&str>,
    ) -> Result<i32, DomainError> {
        let mut state = self.lock();
        let claim = state
            .claims
            .iter()
            .find(|c| c.id == claim_id)
            .cloned()
            .ok_or(DomainError::NotFound("Table claim"))?;
        let table_name = state
            .tables
            .iter()
            .find(|t| t.id == claim.table_id)
            .map(|t| t.display_name.clone())
            .unwrap_or_default();
        let request = AssistanceRequest {
            id: state.id(),
            table_claim_id: claim_id,
            kind,
            message: message.map(str::to_string),
            is_hidden: false,
            table_id: claim.table_id,
            table_name,
            created_at: state.now(),
        };
        let id = request.id;
        state.assistance.push(request);
        Ok(id)
    }

    fn list_visible(&self, establishment_id: i32) -> Result<Vec<AssistanceRequest>, DomainError> {
        let state = self.lock();
        let mut visible: Vec<_> = state
            .assistance
            .iter()
            .filter(|r| {
                !r.is_hidden
                    && state
                        .tables
                        .iter()
                        .any(|t| t.id == r.table_id && t.establishment_id == establishment_id)
            })
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    fn hide(&self, id: i32) -> Result<i32, DomainError> {
        let mut state = self.lock();
        let request = state
            .assistance
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound("Assistance request"))?;
        request.is_hidden = true;
        Ok(request.table_claim_id)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(i32, Signal)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(i32, Signal)> {
        self.events.lock().expect("events lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, claim_id: i32, signal: Signal) {
        self.events
            .lock()
            .expect("events lock poisoned")
            .push((claim_id, signal));
    }
}

pub struct FakeTokens;

impl TokenIssuer for FakeTokens {
    fn issue_customer_token(&self, customer_id: i32, claim_id: i32) -> Result<String, DomainError> {
        Ok(format!("token-{customer_id}-{claim_id}"))
    }
}

pub fn dec(s: &str) -> BigDecimal {
    s.parse().expect("valid decimal")
}
