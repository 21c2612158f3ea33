use anyhow::Context;
use cep_weather::adapters::{build_http_client, HttpResolverClient};
use cep_weather::app::{gateway, serve, GatewayState};
use cep_weather::config::GatewayArgs;
use cep_weather::telemetry;
use cep_weather::utils::{logger, validation::Validate};
use cep_weather::{ForwardPipeline, GatewayConfig};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::instrument::WithSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = GatewayArgs::parse();

    let config = match GatewayConfig::from_args(&args).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    let listen_addr = config.listen_addr()?;

    // collector 連線期間先用暫時的 subscriber 輸出 log
    let telemetry = telemetry::bootstrap(&config.telemetry)
        .with_subscriber(logger::bootstrap_subscriber(config.logging.verbose))
        .await;
    logger::init_service_logger(
        config.logging.format,
        config.logging.verbose,
        telemetry.tracer(),
    );

    tracing::info!(
        service = %config.telemetry.service_name,
        resolver = %config.resolver_url,
        tracing_enabled = telemetry.is_enabled(),
        "🚀 Starting CEP gateway"
    );

    let client = build_http_client(config.resolver_timeout)?;
    let resolver = HttpResolverClient::new(client, config.resolver_url.clone(), telemetry.propagator());
    let state = GatewayState::new(ForwardPipeline::new(Arc::new(resolver)), telemetry.propagator());

    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    let result = serve(listener, gateway::router(state)).await;

    telemetry.shutdown().await;
    result.context("gateway server error")
}
