pub mod cli;
pub mod toml_config;

pub use cli::{GatewayArgs, LoggingArgs, ResolverArgs, TelemetryArgs};
pub use toml_config::FileConfig;

use crate::adapters::directory::DEFAULT_DIRECTORY_URL;
use crate::adapters::resolver_client::DEFAULT_RESOLVER_URL;
use crate::adapters::weather::DEFAULT_WEATHER_URL;
use crate::telemetry::{RetryPolicy, TelemetryConfig};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    parse_listen_addr, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GATEWAY_LISTEN: &str = ":8080";
pub const DEFAULT_RESOLVER_LISTEN: &str = ":8081";
pub const DEFAULT_COLLECTOR_ENDPOINT: &str = "otel-collector:4317";
pub const DEFAULT_GATEWAY_SERVICE_NAME: &str = "servico-a";
pub const DEFAULT_RESOLVER_SERVICE_NAME: &str = "servico-b";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const MAX_TIMEOUT_SECS: u64 = 300;

/// 日誌設定，兩個服務共用
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub verbose: bool,
}

/// Gateway (servico-a) 的最終設定：CLI/env > 設定檔 > 預設值
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen: String,
    pub resolver_url: String,
    pub resolver_timeout: Duration,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

/// Resolver (servico-b) 的最終設定
#[derive(Clone)]
pub struct ResolverConfig {
    pub listen: String,
    pub weather_api_key: Option<String>,
    pub directory_api_url: String,
    pub weather_api_url: String,
    pub upstream_timeout: Duration,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

fn load_file(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => {
            tracing::debug!("📄 Loading configuration file {}", path.display());
            FileConfig::from_file(path)
        }
        None => Ok(FileConfig::default()),
    }
}

fn merge_logging(args: &LoggingArgs, file: &FileConfig) -> LoggingConfig {
    LoggingConfig {
        format: args
            .log_format
            .or(file.logging.format)
            .unwrap_or_default(),
        verbose: args.verbose || file.logging.verbose.unwrap_or(false),
    }
}

fn merge_telemetry(args: &TelemetryArgs, file: &FileConfig, default_service: &str) -> TelemetryConfig {
    let section = &file.telemetry;
    let defaults = RetryPolicy::default();

    // OTEL_SDK_DISABLED=true 代表關閉；設定檔用 enabled
    let enabled = match args.disabled {
        Some(disabled) => !disabled,
        None => section.enabled.unwrap_or(true),
    };

    TelemetryConfig {
        service_name: args
            .service_name
            .clone()
            .or_else(|| section.service_name.clone())
            .unwrap_or_else(|| default_service.to_string()),
        collector_endpoint: args
            .collector_endpoint
            .clone()
            .or_else(|| section.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_COLLECTOR_ENDPOINT.to_string()),
        retry: RetryPolicy {
            max_attempts: args
                .max_attempts
                .or(section.max_attempts)
                .unwrap_or(defaults.max_attempts),
            delay: args
                .retry_delay_secs
                .or(section.retry_delay_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.delay),
            connect_timeout: args
                .connect_timeout_secs
                .or(section.connect_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        },
        enabled,
    }
}

fn validate_timeout(field: &str, timeout: Duration) -> Result<()> {
    validate_range(field, timeout.as_secs(), 1, MAX_TIMEOUT_SECS)
}

fn validate_telemetry(config: &TelemetryConfig) -> Result<()> {
    validate_non_empty_string("telemetry.service_name", &config.service_name)?;
    if !config.enabled {
        return Ok(());
    }

    crate::telemetry::bootstrap::collector_address(&config.collector_endpoint)?;
    validate_positive_number(
        "telemetry.max_attempts",
        u64::from(config.retry.max_attempts),
        1,
    )?;
    validate_timeout("telemetry.connect_timeout_secs", config.retry.connect_timeout)
}

impl GatewayConfig {
    pub fn from_args(args: &GatewayArgs) -> Result<Self> {
        let file = load_file(args.config.as_deref())?;
        Ok(Self::merge(args, &file))
    }

    pub fn merge(args: &GatewayArgs, file: &FileConfig) -> Self {
        Self {
            listen: args
                .listen
                .clone()
                .or_else(|| file.server.listen.clone())
                .unwrap_or_else(|| DEFAULT_GATEWAY_LISTEN.to_string()),
            resolver_url: args
                .resolver_url
                .clone()
                .or_else(|| args.legacy_resolver_url.clone())
                .or_else(|| file.resolver.url.clone())
                .unwrap_or_else(|| DEFAULT_RESOLVER_URL.to_string()),
            resolver_timeout: Duration::from_secs(
                args.resolver_timeout_secs
                    .or(file.resolver.timeout_secs)
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
            telemetry: merge_telemetry(&args.telemetry, file, DEFAULT_GATEWAY_SERVICE_NAME),
            logging: merge_logging(&args.logging, file),
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen_addr("listen", &self.listen)
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        validate_url("resolver_url", &self.resolver_url)?;
        validate_timeout("resolver_timeout_secs", self.resolver_timeout)?;
        validate_telemetry(&self.telemetry)
    }
}

impl ResolverConfig {
    pub fn from_args(args: &ResolverArgs) -> Result<Self> {
        let file = load_file(args.config.as_deref())?;
        Ok(Self::merge(args, &file))
    }

    pub fn merge(args: &ResolverArgs, file: &FileConfig) -> Self {
        Self {
            listen: args
                .listen
                .clone()
                .or_else(|| file.server.listen.clone())
                .unwrap_or_else(|| DEFAULT_RESOLVER_LISTEN.to_string()),
            weather_api_key: args
                .weather_api_key
                .clone()
                .or_else(|| file.upstream.weather_api_key.clone()),
            directory_api_url: args
                .directory_api_url
                .clone()
                .or_else(|| file.upstream.directory_url.clone())
                .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string()),
            weather_api_url: args
                .weather_api_url
                .clone()
                .or_else(|| file.upstream.weather_url.clone())
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            upstream_timeout: Duration::from_secs(
                args.upstream_timeout_secs
                    .or(file.upstream.timeout_secs)
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
            telemetry: merge_telemetry(&args.telemetry, file, DEFAULT_RESOLVER_SERVICE_NAME),
            logging: merge_logging(&args.logging, file),
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen_addr("listen", &self.listen)
    }

    pub fn has_weather_api_key(&self) -> bool {
        self.weather_api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }
}

impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("listen", &self.listen)
            .field("weather_api_key", &self.weather_api_key.as_ref().map(|_| "<redacted>"))
            .field("directory_api_url", &self.directory_api_url)
            .field("weather_api_url", &self.weather_api_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("telemetry", &self.telemetry)
            .field("logging", &self.logging)
            .finish()
    }
}

// 缺少 WEATHER_API_KEY 不算設定錯誤：服務照常啟動，查詢時回 500
impl Validate for ResolverConfig {
    fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        validate_url("directory_api_url", &self.directory_api_url)?;
        validate_url("weather_api_url", &self.weather_api_url)?;
        validate_timeout("upstream_timeout_secs", self.upstream_timeout)?;
        validate_telemetry(&self.telemetry)
    }
}
