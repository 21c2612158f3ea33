use crate::adapters::join_url;
use crate::domain::model::CEP_HEADER;
use crate::domain::ports::{ResolverClient, ResolverReply};
use crate::telemetry::Propagator;
use crate::utils::error::{CepError, Result};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Instant;

pub const DEFAULT_RESOLVER_URL: &str = "http://servico-b:8081";

/// Gateway → Resolver 的 HTTP client，會把目前 span 的 trace context 帶到 outbound headers
#[derive(Clone)]
pub struct HttpResolverClient {
    client: Client,
    base_url: String,
    propagator: Propagator,
}

impl HttpResolverClient {
    pub fn new(client: Client, base_url: impl Into<String>, propagator: Propagator) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            propagator,
        }
    }

    fn outbound_headers(&self, cep: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let value = HeaderValue::from_str(cep).map_err(|_| CepError::InvalidZipcode)?;
        headers.insert(HeaderName::from_static(CEP_HEADER), value);

        self.propagator.inject(&tracing::Span::current(), &mut headers);
        Ok(headers)
    }
}

#[async_trait]
impl ResolverClient for HttpResolverClient {
    async fn temperature(&self, cep: &str) -> Result<ResolverReply> {
        let url = join_url(&self.base_url, "temperature");
        let headers = self.outbound_headers(cep)?;

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %url, "resolver request failed");
                CepError::Http(e)
            })?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = %status, "Resolver call took {:?}", started.elapsed());

        Ok(ResolverReply { status, body })
    }
}
