use crate::adapters::join_url;
use crate::domain::model::DirectoryLookupResult;
use crate::domain::ports::DirectoryLookup;
use crate::utils::error::{CepError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Instant;

pub const DEFAULT_DIRECTORY_URL: &str = "https://viacep.com.br";

/// ViaCEP 目錄 API client
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn lookup_url(&self, cep: &str) -> String {
        join_url(&self.base_url, &format!("ws/{}/json/", cep))
    }
}

#[async_trait]
impl DirectoryLookup for ViaCepClient {
    #[tracing::instrument(
        name = "directory.lookup",
        skip(self),
        fields(
            otel.kind = "client",
            http.method = "GET",
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    async fn lookup(&self, cep: &str) -> Result<DirectoryLookupResult> {
        let url = self.lookup_url(cep);
        let span = tracing::Span::current();
        span.record("http.url", url.as_str());

        let started = Instant::now();
        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "directory request failed");
            CepError::Http(e)
        })?;
        let status = response.status();
        span.record("http.status_code", status.as_u16());

        // 目錄 API 以 400 表示 CEP 格式不被接受
        if status == StatusCode::BAD_REQUEST {
            return Err(CepError::InvalidZipcode);
        }

        let body = response.bytes().await?;
        let address: DirectoryLookupResult = serde_json::from_slice(&body)?;

        if address.is_not_found() {
            tracing::info!(cep, "directory has no entry for CEP");
            return Err(CepError::ZipcodeNotFound);
        }

        tracing::debug!("CEP search took {:?}", started.elapsed());
        Ok(address)
    }
}
