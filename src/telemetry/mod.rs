pub mod bootstrap;
pub mod propagation;

pub use bootstrap::{bootstrap, init_telemetry, RetryPolicy, TelemetryConfig};
pub use propagation::Propagator;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer};

/// 行程層級的 tracing 狀態；provider 為 `None` 代表以無 tracing 模式執行
pub struct Telemetry {
    service_name: String,
    provider: Option<SdkTracerProvider>,
    propagator: Propagator,
}

impl Telemetry {
    pub fn new(
        service_name: String,
        provider: Option<SdkTracerProvider>,
        propagator: Propagator,
    ) -> Self {
        Self {
            service_name,
            provider,
            propagator,
        }
    }

    pub fn disabled(service_name: String) -> Self {
        Self::new(service_name, None, Propagator::trace_context())
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn tracer(&self) -> Option<Tracer> {
        self.provider
            .as_ref()
            .map(|provider| provider.tracer(self.service_name.clone()))
    }

    pub fn propagator(&self) -> Propagator {
        self.propagator.clone()
    }

    /// flush 並停止 exporter；失敗只記錄警告
    pub async fn shutdown(self) {
        let Some(provider) = self.provider else {
            return;
        };

        tracing::info!("Shutting down tracer provider");
        match tokio::task::spawn_blocking(move || provider.shutdown()).await {
            Ok(Ok(())) => tracing::debug!("Tracer provider flushed"),
            Ok(Err(e)) => tracing::warn!("Failed to shutdown TracerProvider: {}", e),
            Err(e) => tracing::warn!("Tracer provider shutdown task failed: {}", e),
        }
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("service_name", &self.service_name)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
