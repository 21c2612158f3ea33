use crate::app::server::with_middleware;
use crate::core::forward_pipeline::{ForwardOutcome, ForwardPipeline};
use crate::domain::model::PostalCodeRequest;
use crate::telemetry::Propagator;
use crate::utils::error::{CepError, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::field::Empty;
use tracing::Instrument;

#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: ForwardPipeline,
    pub propagator: Propagator,
}

impl GatewayState {
    pub fn new(pipeline: ForwardPipeline, propagator: Propagator) -> Self {
        Self {
            pipeline,
            propagator,
        }
    }
}

pub fn router(state: GatewayState) -> Router {
    let propagator = state.propagator.clone();
    with_middleware(
        Router::new().route("/", post(handle_cep)).with_state(state),
        propagator,
    )
}

// 只解第一個 JSON 值，後面多餘的資料忽略；
// `null` 與 `{}` 一樣視為空 CEP，交給驗證處理
fn parse_request(body: &[u8]) -> Result<PostalCodeRequest> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Option<PostalCodeRequest>>();
    match values.next() {
        Some(Ok(request)) => Ok(request.unwrap_or_default()),
        Some(Err(e)) => Err(CepError::MalformedBody {
            reason: e.to_string(),
        }),
        None => Err(CepError::MalformedBody {
            reason: "empty body".to_string(),
        }),
    }
}

pub async fn handle_cep(State(state): State<GatewayState>, body: Bytes) -> Response {
    let span = tracing::info_span!(
        "gateway.handle_cep",
        otel.kind = "server",
        cep = Empty,
        http.status_code = Empty,
    );
    async move {
        let response = match forward(&state, &body).await {
            Ok(outcome) => outcome_response(outcome),
            Err(e) => e.into_response(),
        };
        tracing::Span::current().record("http.status_code", response.status().as_u16());
        response
    }
    .instrument(span)
    .await
}

async fn forward(state: &GatewayState, body: &[u8]) -> Result<ForwardOutcome> {
    let request = parse_request(body)?;
    tracing::Span::current().record("cep", request.cep.as_str());
    tracing::debug!("📥 received CEP {:?}", request.cep);

    state.pipeline.forward(&request.cep).await
}

fn outcome_response(outcome: ForwardOutcome) -> Response {
    match outcome {
        ForwardOutcome::Success(result) => (StatusCode::OK, Json(result)).into_response(),
        ForwardOutcome::Relayed { status, body } => {
            (status, [(CONTENT_TYPE, "application/json")], body).into_response()
        }
    }
}
