use std::io;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use store::{Store, TransactionEngine};

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::Config;
use state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    log::info!(
        "configuration loaded: bind={}:{} max_connections={} error_status={:?}",
        config.host,
        config.port,
        config.store.max_connections,
        config.error_status
    );

    let store = Store::connect(&config.store).await.map_err(|e| {
        log::error!("failed to connect to PostgreSQL: {}", e);
        io::Error::other(e)
    })?;
    store.migrate().await.map_err(|e| {
        log::error!("failed to apply migrations: {}", e);
        io::Error::other(e)
    })?;
    log::info!("migrations applied");

    let store = Arc::new(store);
    let engine = TransactionEngine::new(store.clone());
    let state = web::Data::new(AppState::new(engine, config.error_status));

    log::info!("starting server on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::new("%a \"%r\" %s %b %Dms request_id=%{x-request-id}o"))
            .configure(routes::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("server stopped, closing PostgreSQL pool");
    store.close().await;
    Ok(())
}
