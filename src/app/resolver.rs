use crate::app::server::with_middleware;
use crate::core::temperature_pipeline::TemperaturePipeline;
use crate::domain::model::{TemperatureResult, CEP_HEADER};
use crate::telemetry::Propagator;
use crate::utils::error::{CepError, Result};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::field::Empty;
use tracing::Instrument;

#[derive(Clone)]
pub struct ResolverState {
    pub pipeline: TemperaturePipeline,
    pub propagator: Propagator,
}

impl ResolverState {
    pub fn new(pipeline: TemperaturePipeline, propagator: Propagator) -> Self {
        Self {
            pipeline,
            propagator,
        }
    }
}

pub fn router(state: ResolverState) -> Router {
    let propagator = state.propagator.clone();
    with_middleware(
        Router::new()
            .route("/temperature", post(handle_temperature))
            .with_state(state),
        propagator,
    )
}

/// 讀取 `X-CEP`；缺少或空字串都算缺少
fn cep_from_headers(headers: &HeaderMap) -> Result<&str> {
    let value = headers.get(CEP_HEADER).ok_or(CepError::MissingCepHeader)?;
    if value.is_empty() {
        return Err(CepError::MissingCepHeader);
    }
    value.to_str().map_err(|_| CepError::InvalidZipcode)
}

pub async fn handle_temperature(
    State(state): State<ResolverState>,
    headers: HeaderMap,
) -> Response {
    let span = tracing::info_span!(
        "resolver.handle_temperature",
        otel.kind = "server",
        cep = Empty,
        http.status_code = Empty,
    );
    async move {
        let response = match resolve(&state, &headers).await {
            Ok(result) => Json(result).into_response(),
            Err(e) => e.into_response(),
        };
        tracing::Span::current().record("http.status_code", response.status().as_u16());
        response
    }
    .instrument(span)
    .await
}

async fn resolve(state: &ResolverState, headers: &HeaderMap) -> Result<TemperatureResult> {
    let cep = cep_from_headers(headers)?;
    tracing::Span::current().record("cep", cep);

    state.pipeline.resolve(cep).await
}
