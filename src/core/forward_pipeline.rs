use crate::domain::model::TemperatureResult;
use crate::domain::ports::ResolverClient;
use crate::utils::error::{CepError, Result};
use crate::utils::validation::validate_cep;
use axum::body::Bytes;
use http::StatusCode;
use std::sync::Arc;
use tracing::Instrument;

/// Gateway 轉送的結果
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    /// Resolver 回 200，body 已解碼
    Success(TemperatureResult),
    /// Resolver 回非 200，狀態碼與 body 原封不動轉回給客戶端
    Relayed { status: StatusCode, body: Bytes },
}

/// Gateway 的處理流程：驗證 → 呼叫 Resolver → 分類回應
#[derive(Clone)]
pub struct ForwardPipeline {
    resolver: Arc<dyn ResolverClient>,
}

impl ForwardPipeline {
    pub fn new(resolver: Arc<dyn ResolverClient>) -> Self {
        Self { resolver }
    }

    pub async fn forward(&self, cep: &str) -> Result<ForwardOutcome> {
        let is_valid = tracing::info_span!("gateway.validate_cep").in_scope(|| validate_cep(cep));
        if !is_valid {
            return Err(CepError::InvalidZipcode);
        }

        let call_span = tracing::info_span!("gateway.call_resolver", cep, http.status_code = tracing::field::Empty);
        let reply = self
            .resolver
            .temperature(cep)
            .instrument(call_span.clone())
            .await?;
        call_span.record("http.status_code", reply.status.as_u16());

        if reply.status != StatusCode::OK {
            tracing::info!(status = %reply.status, "relaying resolver error");
            return Ok(ForwardOutcome::Relayed {
                status: reply.status,
                body: reply.body,
            });
        }

        let result: TemperatureResult = call_span.in_scope(|| {
            serde_json::from_slice(&reply.body).map_err(|e| {
                tracing::error!(error = %e, "resolver returned an undecodable 200 body");
                CepError::Decode(e)
            })
        })?;

        Ok(ForwardOutcome::Success(result))
    }
}
