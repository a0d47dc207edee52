use anyhow::Context;
use chainflow::datasource::GatewayChainReader;
use chainflow::{api, config::Config, Address, ChainReader, LogicEvaluator, Simulator};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let registry = config
        .load_asset_registry()
        .context("Failed to load asset registry")?;

    let reader: Arc<dyn ChainReader> =
        Arc::new(GatewayChainReader::new(config.read_gateway_url.clone()));
    let evaluator = LogicEvaluator::new(
        reader,
        registry,
        Address::new(config.inspect_sender.clone()),
    );
    let simulator = Arc::new(Simulator::new(evaluator, config.cycle_policy));

    let port = config.port;
    let app = api::create_router(api::AppState::new(config, simulator));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
