use anyhow::Context;
use cep_weather::adapters::{build_http_client, ViaCepClient, WeatherApiClient};
use cep_weather::app::{resolver, serve, ResolverState};
use cep_weather::config::ResolverArgs;
use cep_weather::telemetry;
use cep_weather::utils::{logger, validation::Validate};
use cep_weather::{ResolverConfig, TemperaturePipeline};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::instrument::WithSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ResolverArgs::parse();

    let config = match ResolverConfig::from_args(&args).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    let listen_addr = config.listen_addr()?;

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
        directory = %config.directory_api_url,
        weather = %config.weather_api_url,
        tracing_enabled = telemetry.is_enabled(),
        "🚀 Starting CEP temperature resolver"
    );
    if !config.has_weather_api_key() {
        tracing::warn!("⚠️ WEATHER_API_KEY not set, temperature lookups will fail with 500");
    }

    let client = build_http_client(config.upstream_timeout)?;
    let directory = ViaCepClient::new(client.clone(), config.directory_api_url.clone());
    let weather = WeatherApiClient::new(
        client,
        config.weather_api_url.clone(),
        config.weather_api_key.clone(),
    );
    let pipeline = TemperaturePipeline::new(Arc::new(directory), Arc::new(weather));
    let state = ResolverState::new(pipeline, telemetry.propagator());

    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    let result = serve(listener, resolver::router(state)).await;

    telemetry.shutdown().await;
    result.context("resolver server error")
}
