use actix_web::HttpServer;
use common::rate_limit::PRUNE_INTERVAL;
use customers::{config::Config, create_app, ServiceState};
use dotenv::dotenv;
use mongodb::Client;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let client = Client::with_uri_str(&config.database_uri).await?;
    let database = client.database(&config.database_name);
    let state = ServiceState::new(&database, &config);
    state.limiter.spawn_pruning(PRUNE_INTERVAL);

    log::info!(
        "Serving customers on {}:{} (database {})",
        config.bind_address,
        config.port,
        config.database_name
    );

    HttpServer::new(move || create_app(state.clone()))
        .bind((config.bind_address.as_str(), config.port))?
        .run()
        .await?;
    Ok(())
}
