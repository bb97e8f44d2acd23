use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{assistance, claims, health, orders};
use crate::realtime::socket;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        claims::check_availability,
        claims::sign_in,
        claims::current_user,
        claims::get_claimed,
        claims::toggle_access_requests,
        claims::toggle_seats_limit,
        claims::toggle_table_order_claim,
        claims::toggle_availability,
        orders::calculate_price,
        orders::place_order,
        orders::get_table_order,
        orders::cancel_order,
        orders::update_status,
        orders::get_active_orders,
        orders::get_customer_receipt,
        orders::get_receipts,
        orders::get_receipt_total,
        assistance::request_assistance,
        assistance::list_assistance,
        assistance::dismiss_assistance,
        socket::connect,
        health::health,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "claims", description = "Table claims and customer membership"),
        (name = "orders", description = "Table orders, customer orders and receipts"),
        (name = "assistance", description = "Customer assistance requests"),
        (name = "realtime", description = "Change notifications over WebSocket"),
        (name = "health", description = "Liveness"),
    ),
    info(
        title = "Table Service API",
        version = "0.1.0",
        description = "Table claims, shared orders and assistance requests for restaurants",
    )
)]
pub struct ApiDoc;
