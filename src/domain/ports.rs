use super::assistance::{AssistanceKind, AssistanceRequest};
use super::claim::{CustomerView, JoinOutcome, TableClaim, TableInfo};
use super::errors::DomainError;
use super::order::{
    ActiveTableOrder, CustomerOrderStatus, CustomerOrderView, DateRange, DishPrice, OptionPrice,
    PlacedOrder, PricedLine, TableOrderView,
};

pub trait ClaimRepository: Send + Sync + 'static {
    fn find_table(&self, table_id: i32) -> Result<Option<TableInfo>, DomainError>;
    /// The ACTIVE claim of a table, with its live customer count.
    fn active_claim(&self, table_id: i32) -> Result<Option<(TableClaim, i64)>, DomainError>;
    /// Find-or-create the table's ACTIVE claim and attach a new customer, as
    /// one atomic unit per table. Admission is re-evaluated under the lock.
    fn join(
        &self,
        table: &TableInfo,
        display_name: &str,
        request_code: Option<&str>,
        new_claim_code: &str,
    ) -> Result<JoinOutcome, DomainError>;
    fn find_claim(&self, claim_id: i32) -> Result<Option<TableClaim>, DomainError>;
    fn find_customer(&self, customer_id: i32) -> Result<Option<CustomerView>, DomainError>;
    /// Ordered by join time, then id.
    fn claim_customers(&self, claim_id: i32) -> Result<Vec<CustomerView>, DomainError>;
    fn toggle_requests(&self, claim_id: i32, new_code: &str) -> Result<TableClaim, DomainError>;
    fn toggle_seats_bypass(&self, claim_id: i32) -> Result<TableClaim, DomainError>;
    /// Flips ACTIVE/CLOSED on the claim owning the given table order.
    fn toggle_claim_status(&self, table_order_id: i32) -> Result<TableClaim, DomainError>;
    fn toggle_table_availability(&self, table_id: i32) -> Result<TableInfo, DomainError>;
}

/// Read side of the menu catalog.
pub trait MenuCatalog: Send + Sync + 'static {
    fn find_dish(&self, dish_id: i32) -> Result<Option<DishPrice>, DomainError>;
    /// Options of the dish among `option_ids`; unknown ids are simply absent.
    fn find_options(&self, dish_id: i32, option_ids: &[i32])
        -> Result<Vec<OptionPrice>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Fails with `ClaimNotActive` unless the claim is ACTIVE. The claim's
    /// ACTIVE table order is created on first use.
    fn place(
        &self,
        claim_id: i32,
        customer_id: i32,
        line: &PricedLine,
        comment: Option<&str>,
    ) -> Result<PlacedOrder, DomainError>;
    /// CREATED→CANCELLED for the owner only. Returns the claim id.
    fn cancel_own(&self, customer_order_id: i32, customer_id: i32) -> Result<i32, DomainError>;
    /// Returns the updated order and its claim id.
    fn update_status(
        &self,
        customer_order_id: i32,
        status: CustomerOrderStatus,
    ) -> Result<(CustomerOrderView, i32), DomainError>;
    /// The ACTIVE table order of the claim, else its most recent one.
    fn table_order_for_claim(&self, claim_id: i32) -> Result<Option<TableOrderView>, DomainError>;
    /// ACTIVE table orders created inside `range`, most recently updated first.
    fn active_table_orders(&self, range: DateRange) -> Result<Vec<ActiveTableOrder>, DomainError>;
    fn orders_for_claim(&self, claim_id: i32) -> Result<Vec<CustomerOrderView>, DomainError>;
    fn orders_of_customer(&self, customer_id: i32) -> Result<Vec<CustomerOrderView>, DomainError>;
}

pub trait AssistanceRepository: Send + Sync + 'static {
    fn create(
        &self,
        claim_id: i32,
        kind: AssistanceKind,
        message: Option<&str>,
    ) -> Result<i32, DomainError>;
    /// Visible requests for the establishment's tables, newest first.
    fn list_visible(&self, establishment_id: i32) -> Result<Vec<AssistanceRequest>, DomainError>;
    /// Soft delete. Returns the claim id.
    fn hide(&self, id: i32) -> Result<i32, DomainError>;
}

/// Content-free "something changed" signals pushed to live connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Membership or gating changed.
    Joined,
    /// Order, claim or assistance state changed.
    Status,
}

impl Signal {
    pub fn event_name(&self) -> &'static str {
        match self {
            Signal::Joined => "joined",
            Signal::Status => "status",
        }
    }
}

/// Fire-and-forget fan-out. Implementations must not block and never fail
/// the caller; delivery problems are logged.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, claim_id: i32, signal: Signal);
}

pub trait TokenIssuer: Send + Sync + 'static {
    fn issue_customer_token(&self, customer_id: i32, claim_id: i32) -> Result<String, DomainError>;
}
