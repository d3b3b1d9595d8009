use tally_api::setup;
use tally_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration; a missing ANTHROPIC_API_KEY stops here
    let config = Config::from_env()?;

    // Initialize the application (storage, gateway, repository, routes)
    let (state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, state, router).await?;

    Ok(())
}
