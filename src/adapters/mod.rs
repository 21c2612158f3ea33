// Adapters layer: HTTP clients for the directory API, the weather API and the Resolver.

pub mod directory;
pub mod resolver_client;
pub mod weather;

pub use directory::ViaCepClient;
pub use resolver_client::HttpResolverClient;
pub use weather::WeatherApiClient;

use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

/// 所有 outbound 呼叫共用的 client 設定
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
