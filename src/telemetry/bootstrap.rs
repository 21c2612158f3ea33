// 啟動時等待 collector 並建立 OTLP exporter；失敗時退回無 tracing 模式

use crate::telemetry::{Propagator, Telemetry};
use crate::utils::error::{CepError, Result};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracerProvider},
    Resource,
};
use std::time::Duration;
use tokio::net::TcpStream;
use url::{Host, Url};

/// OTLP/gRPC 預設埠
pub const DEFAULT_COLLECTOR_PORT: u16 = 4317;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub connect_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            delay: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// `host:port` 或 `http(s)://host:port`
    pub collector_endpoint: String,
    pub retry: RetryPolicy,
    pub enabled: bool,
}

/// 沒有 scheme 時補上 `http://`，tonic exporter 需要完整 URI
pub fn exporter_endpoint(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

pub fn collector_address(raw: &str) -> Result<(String, u16)> {
    let endpoint = exporter_endpoint(raw);
    let invalid = |reason: String| CepError::InvalidConfigValueError {
        field: "collector_endpoint".to_string(),
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(&endpoint).map_err(|e| invalid(format!("Invalid endpoint: {}", e)))?;
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => return Err(invalid("Endpoint has no host".to_string())),
    };

    Ok((host, url.port().unwrap_or(DEFAULT_COLLECTOR_PORT)))
}

/// 重試連線到 collector，回傳成功時的嘗試次數
pub async fn wait_for_collector(endpoint: &str, policy: &RetryPolicy) -> Result<u32> {
    let (host, port) = collector_address(endpoint)?;
    let mut last_error = String::from("no connection attempt was made");

    for attempt in 1..=policy.max_attempts {
        match tokio::time::timeout(policy.connect_timeout, TcpStream::connect((host.as_str(), port)))
            .await
        {
            Ok(Ok(_stream)) => {
                tracing::info!(
                    "🔗 Successfully connected to OTEL collector after {} attempts",
                    attempt
                );
                return Ok(attempt);
            }
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => {
                last_error = format!("connect timed out after {:?}", policy.connect_timeout)
            }
        }

        if attempt < policy.max_attempts {
            tracing::warn!(
                "Failed to connect to collector (attempt {}/{}): {}. Retrying in {:?}...",
                attempt,
                policy.max_attempts,
                last_error,
                policy.delay
            );
            tokio::time::sleep(policy.delay).await;
        }
    }

    Err(CepError::Telemetry {
        message: format!(
            "failed to connect to collector at {} after {} attempts: {}",
            endpoint, policy.max_attempts, last_error
        ),
    })
}

/// 建立 exporter 與 tracer provider；collector 連不上時回傳錯誤
pub async fn init_telemetry(config: &TelemetryConfig) -> Result<Telemetry> {
    wait_for_collector(&config.collector_endpoint, &config.retry).await?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(exporter_endpoint(&config.collector_endpoint))
        .build()
        .map_err(|e| CepError::Telemetry {
            message: format!("failed to create trace exporter: {}", e),
        })?;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .build();

    tracing::info!(
        service = %config.service_name,
        endpoint = %config.collector_endpoint,
        "OpenTelemetry tracer provider installed"
    );

    Ok(Telemetry::new(
        config.service_name.clone(),
        Some(provider),
        Propagator::trace_context(),
    ))
}

/// 啟動時呼叫：失敗只記錄警告，改以無 tracing 模式繼續
pub async fn bootstrap(config: &TelemetryConfig) -> Telemetry {
    if !config.enabled {
        tracing::info!("Tracing disabled by configuration");
        return Telemetry::disabled(config.service_name.clone());
    }

    match init_telemetry(config).await {
        Ok(telemetry) => telemetry,
        Err(e) => {
            tracing::warn!(
                "⚠️ Failed to initialize OTEL provider: {}. Continuing without tracing.",
                e
            );
            Telemetry::disabled(config.service_name.clone())
        }
    }
}
