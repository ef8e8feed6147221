use projmeta_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    projmeta_api::telemetry::init_telemetry(config.is_production());

    let (_state, router) = projmeta_api::setup::initialize_app(config.clone()).await?;

    projmeta_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
