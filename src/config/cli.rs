use crate::utils::logger::LogFormat;
use clap::{Args, Parser};
use std::path::PathBuf;

/// 兩個服務共用的 tracing 參數
#[derive(Debug, Clone, Default, Args)]
pub struct TelemetryArgs {
    #[arg(long = "otel-endpoint", env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub collector_endpoint: Option<String>,

    #[arg(long, env = "OTEL_SERVICE_NAME")]
    pub service_name: Option<String>,

    #[arg(long = "otel-max-attempts", env = "OTEL_CONNECT_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    #[arg(long = "otel-retry-delay-secs", env = "OTEL_CONNECT_RETRY_DELAY_SECS")]
    pub retry_delay_secs: Option<u64>,

    #[arg(long = "otel-connect-timeout-secs", env = "OTEL_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: Option<u64>,

    #[arg(long = "otel-disabled", env = "OTEL_SDK_DISABLED")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct LoggingArgs {
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "cep-gateway")]
#[command(about = "Validates a CEP and forwards it to the temperature resolver")]
pub struct GatewayArgs {
    /// 監聽位址：`:8080`、`8080` 或 `host:port`
    #[arg(long, env = "HTTP_PORT")]
    pub listen: Option<String>,

    #[arg(long, env = "RESOLVER_URL")]
    pub resolver_url: Option<String>,

    /// 舊部署使用的變數名稱，`RESOLVER_URL` 沒設定時才採用
    #[arg(long = "servico-b-url", env = "SERVICO_B_URL", hide = true)]
    pub legacy_resolver_url: Option<String>,

    #[arg(long, env = "RESOLVER_TIMEOUT_SECS")]
    pub resolver_timeout_secs: Option<u64>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "cep-resolver")]
#[command(about = "Resolves a CEP to its city and current temperature")]
pub struct ResolverArgs {
    #[arg(long, env = "HTTP_PORT")]
    pub listen: Option<String>,

    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: Option<String>,

    #[arg(long, env = "DIRECTORY_API_URL")]
    pub directory_api_url: Option<String>,

    #[arg(long, env = "WEATHER_API_URL")]
    pub weather_api_url: Option<String>,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}
