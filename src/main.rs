use dotenvy::dotenv;
use table_service::{build_server, create_pool, identity::JwtService, run_migrations, AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url, config.db_pool_size) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Could not open the database pool: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    let jwt = JwtService::from_config(&config);

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(pool, jwt, &config.host, config.port)?.await
}
