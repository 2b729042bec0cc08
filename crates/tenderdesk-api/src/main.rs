mod api_doc;
mod auth;
mod constants;
mod error;
mod handlers;
mod middleware;
mod services;
mod setup;
mod state;
mod telemetry;
mod validation;

use tenderdesk_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    telemetry::init_telemetry()?;

    let config = Config::from_env()?;

    let (_state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
