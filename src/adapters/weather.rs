use crate::adapters::join_url;
use crate::domain::model::WeatherLookupResult;
use crate::domain::ports::WeatherLookup;
use crate::utils::error::{CepError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Instant;

pub const DEFAULT_WEATHER_URL: &str = "http://api.weatherapi.com";
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";

/// WeatherAPI client；沒有 API key 時每次查詢都直接失敗，不發出請求
#[derive(Clone)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(CepError::MissingConfig {
                field: WEATHER_API_KEY_VAR.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl WeatherLookup for WeatherApiClient {
    #[tracing::instrument(
        name = "weather.current",
        skip(self),
        fields(
            otel.kind = "client",
            http.method = "GET",
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    async fn current_celsius(&self, city: &str) -> Result<f64> {
        let api_key = self.api_key()?;

        let url = join_url(&self.base_url, "v1/current.json");
        let span = tracing::Span::current();
        // key 不寫進 span
        span.record("http.url", url.as_str());

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| {
                // reqwest 的錯誤訊息會帶完整 URL (含 key)
                let e = e.without_url();
                tracing::error!(error = %e, "weather request failed");
                CepError::Http(e)
            })?;
        let status = response.status();
        span.record("http.status_code", status.as_u16());

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Weather API error response: {}", body);
            return Err(CepError::WeatherApi {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|e| CepError::Http(e.without_url()))?;
        let weather: WeatherLookupResult = serde_json::from_slice(&body)?;

        tracing::debug!("Temperature search took {:?}", started.elapsed());
        Ok(weather.current.temp_c)
    }
}
