pub mod application;
pub mod config;
pub mod db;
pub mod doc;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod infrastructure;
pub mod realtime;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{
    assistance_service::AssistanceService, claim_service::ClaimService,
    order_service::OrderService,
};
use doc::ApiDoc;
use domain::ports::{Notifier, TokenIssuer};
use handlers::{assistance, claims, health, orders};
use identity::JwtService;
use infrastructure::DieselStore;
use realtime::{RealtimeDispatcher, SessionRegistry};

pub use config::AppConfig;
pub use db::{create_pool, DbPool};

pub type ClaimApi = ClaimService<DieselStore>;
pub type OrderApi = OrderService<DieselStore, DieselStore, DieselStore>;
pub type AssistanceApi = AssistanceService<DieselStore, DieselStore>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    jwt: JwtService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let registry = Arc::new(SessionRegistry::new());
    let notifier: Arc<dyn Notifier> = Arc::new(RealtimeDispatcher::new(registry.clone()));
    let jwt = Arc::new(jwt);
    let tokens: Arc<dyn TokenIssuer> = jwt.clone();
    let store = DieselStore::new(pool.clone());

    let claim_api = web::Data::new(ClaimApi::new(store.clone(), notifier.clone(), tokens));
    let order_api = web::Data::new(OrderApi::new(
        store.clone(),
        store.clone(),
        store.clone(),
        notifier.clone(),
    ));
    let assistance_api = web::Data::new(AssistanceApi::new(store.clone(), store, notifier));
    let jwt = web::Data::from(jwt);
    let registry = web::Data::from(registry);
    let pool = web::Data::new(pool);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(jwt.clone())
            .app_data(registry.clone())
            .app_data(claim_api.clone())
            .app_data(order_api.clone())
            .app_data(assistance_api.clone())
            .wrap(Logger::default())
            .route("/health", web::get().to(health::health))
            .route("/ws", web::get().to(realtime::socket::connect))
            .service(
                web::scope("/api")
                    .route("/user", web::get().to(claims::current_user))
                    .route("/claimed", web::get().to(claims::get_claimed))
                    .route(
                        "/toggle-access-requests",
                        web::post().to(claims::toggle_access_requests),
                    )
                    .route(
                        "/claim/{id}/toggle-seats-limit",
                        web::post().to(claims::toggle_seats_limit),
                    )
                    .route("/assistance", web::post().to(assistance::request_assistance))
                    .service(
                        web::scope("/establishment/{eid}")
                            .route("/sign-in", web::post().to(claims::sign_in))
                            .route(
                                "/table/{id}/check-availability",
                                web::get().to(claims::check_availability),
                            )
                            .route(
                                "/table/{id}/toggle-availability",
                                web::post().to(claims::toggle_availability),
                            )
                            .route(
                                "/assistance-requests",
                                web::get().to(assistance::list_assistance),
                            )
                            .route(
                                "/assistance-requests/{id}/dismiss",
                                web::post().to(assistance::dismiss_assistance),
                            ),
                    )
                    .service(
                        web::scope("/order")
                            .route("", web::post().to(orders::place_order))
                            .route("/price", web::post().to(orders::calculate_price))
                            .route("/table", web::post().to(orders::get_table_order))
                            .route("/active", web::post().to(orders::get_active_orders))
                            .route(
                                "/receipt/customer",
                                web::get().to(orders::get_customer_receipt),
                            )
                            .route("/receipt/total", web::get().to(orders::get_receipt_total))
                            .route("/receipts", web::get().to(orders::get_receipts))
                            .route(
                                "/table/{id}/toggle",
                                web::post().to(claims::toggle_table_order_claim),
                            )
                            .route("/{id}/cancel", web::post().to(orders::cancel_order))
                            .route("/{id}/status", web::post().to(orders::update_status)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
