use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    unit_price_with_options, validate_quantity, validate_total, ActiveTableOrder, CustomerOrderStatus,
    CustomerOrderView, DateRange, DishPrice, OptionPrice, PlaceOrder, PlacedOrder, PricedLine,
    Receipt, TableOrderView,
};
use crate::domain::ports::{ClaimRepository, MenuCatalog, Notifier, OrderRepository, Signal};

/// Who is reading a table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Customer(i32),
    Employee,
}

pub struct OrderService<O, M, C> {
    orders: O,
    menu: M,
    claims: C,
    notifier: Arc<dyn Notifier>,
}

impl<O, M, C> OrderService<O, M, C>
where
    O: OrderRepository,
    M: MenuCatalog,
    C: ClaimRepository,
{
    pub fn new(orders: O, menu: M, claims: C, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            orders,
            menu,
            claims,
            notifier,
        }
    }

    /// Resolves the dish and every selected option, in selection order.
    fn resolve(
        &self,
        dish_id: i32,
        option_ids: &[i32],
    ) -> Result<(DishPrice, Vec<OptionPrice>), DomainError> {
        let dish = self
            .menu
            .find_dish(dish_id)?
            .ok_or(DomainError::NotFound("Dish"))?;
        let found = self.menu.find_options(dish_id, option_ids)?;
        let options = option_ids
            .iter()
            .map(|id| {
                found
                    .iter()
                    .find(|o| o.id == *id)
                    .cloned()
                    .ok_or(DomainError::NotFound("Option"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((dish, options))
    }

    /// Price of a single portion: dish base price plus selected options.
    pub fn calculate_price(
        &self,
        dish_id: i32,
        option_ids: &[i32],
    ) -> Result<BigDecimal, DomainError> {
        let (dish, options) = self.resolve(dish_id, option_ids)?;
        Ok(unit_price_with_options(&dish, &options))
    }

    pub fn place_order(&self, request: PlaceOrder) -> Result<PlacedOrder, DomainError> {
        validate_quantity(request.quantity)?;
        let customer = self
            .claims
            .find_customer(request.customer_id)?
            .ok_or(DomainError::NotFound("Customer"))?;
        if customer.table_claim_id != request.claim_id {
            return Err(DomainError::Forbidden("customer does not belong to this claim"));
        }

        let (dish, options) = self.resolve(request.dish_id, &request.option_ids)?;
        let line = PricedLine::new(&dish, &options, request.quantity);
        validate_total(&line.total_price)?;
        let placed = self.orders.place(
            request.claim_id,
            request.customer_id,
            &line,
            request.comment.as_deref(),
        )?;
        log::info!(
            "Order {} placed on table order {} (claim {}), total {}",
            placed.customer_order_id,
            placed.table_order_id,
            request.claim_id,
            line.total_price
        );
        self.notifier.notify(request.claim_id, Signal::Status);
        Ok(placed)
    }

    /// Only the owner may cancel, and only while the order is still CREATED.
    pub fn cancel_own_order(
        &self,
        customer_order_id: i32,
        customer_id: i32,
    ) -> Result<(), DomainError> {
        let claim_id = self.orders.cancel_own(customer_order_id, customer_id)?;
        log::info!("Order {} cancelled by customer {}", customer_order_id, customer_id);
        self.notifier.notify(claim_id, Signal::Status);
        Ok(())
    }

    pub fn update_status(
        &self,
        customer_order_id: i32,
        status: CustomerOrderStatus,
    ) -> Result<CustomerOrderView, DomainError> {
        let (order, claim_id) = self.orders.update_status(customer_order_id, status)?;
        log::info!("Order {} moved to {}", order.id, order.status);
        self.notifier.notify(claim_id, Signal::Status);
        Ok(order)
    }

    pub fn get_table_order(
        &self,
        claim_id: i32,
        requester: Requester,
    ) -> Result<Option<TableOrderView>, DomainError> {
        if let Requester::Customer(customer_id) = requester {
            let customer = self
                .claims
                .find_customer(customer_id)?
                .ok_or(DomainError::NotFound("Customer"))?;
            if customer.table_claim_id != claim_id {
                return Err(DomainError::Forbidden("customer does not belong to this claim"));
            }
        }
        self.orders.table_order_for_claim(claim_id)
    }

    pub fn get_active_orders(
        &self,
        range: DateRange,
        query: Option<&str>,
    ) -> Result<Vec<ActiveTableOrder>, DomainError> {
        let active = self.orders.active_table_orders(range)?;
        Ok(match query {
            Some(q) => active.into_iter().filter(|o| o.matches(q)).collect(),
            None => active,
        })
    }

    /// Non-cancelled orders of the requester's table; `exclude_self` drops
    /// the requester's own orders.
    pub fn get_receipts(
        &self,
        customer_id: i32,
        exclude_self: bool,
    ) -> Result<Receipt, DomainError> {
        let customer = self
            .claims
            .find_customer(customer_id)?
            .ok_or(DomainError::NotFound("Customer"))?;
        let mut orders = self.orders.orders_for_claim(customer.table_claim_id)?;
        if exclude_self {
            orders.retain(|o| o.owner_id != customer_id);
        }
        orders.sort_by_key(|o| (std::cmp::Reverse(o.owner_id), o.id));
        Ok(Receipt::from_orders(orders))
    }

    pub fn get_customer_receipt(&self, customer_id: i32) -> Result<Receipt, DomainError> {
        Ok(Receipt::from_orders(self.orders.orders_of_customer(customer_id)?))
    }
}
