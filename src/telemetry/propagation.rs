// W3C Trace Context：propagator 放在 handler state 裡傳遞，不用全域設定

use http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use std::sync::Arc;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

struct HeadersExtractor<'a>(&'a HeaderMap);

impl Extractor for HeadersExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

struct HeadersInjector<'a>(&'a mut HeaderMap);

impl Injector for HeadersInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(val) = HeaderValue::from_str(&value) {
                self.0.insert(name, val);
            }
        }
    }
}

#[derive(Clone)]
pub struct Propagator {
    inner: Arc<dyn TextMapPropagator + Send + Sync>,
}

impl Propagator {
    pub fn new(inner: Arc<dyn TextMapPropagator + Send + Sync>) -> Self {
        Self { inner }
    }

    pub fn trace_context() -> Self {
        Self::new(Arc::new(TraceContextPropagator::new()))
    }

    /// 將 span 的 trace context 寫入 outbound headers
    pub fn inject(&self, span: &Span, headers: &mut HeaderMap) {
        let cx = span.context();
        self.inner
            .inject_context(&cx, &mut HeadersInjector(headers));
    }

    /// 以 inbound headers 中的 trace context 作為 span 的 parent
    pub fn set_parent(&self, span: &Span, headers: &HeaderMap) {
        let parent_cx = self.inner.extract(&HeadersExtractor(headers));
        let _ = span.set_parent(parent_cx);

        if let Some(trace_id) = get_traceparent(headers).and_then(parse_trace_id) {
            span.record("trace_id", trace_id.as_str());
        }
    }
}

impl Default for Propagator {
    fn default() -> Self {
        Self::trace_context()
    }
}

impl std::fmt::Debug for Propagator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Propagator").finish_non_exhaustive()
    }
}

pub fn get_traceparent(headers: &HeaderMap) -> Option<&str> {
    headers.get(TRACEPARENT)?.to_str().ok()
}

/// Parse trace ID from W3C traceparent header (format: "00-{trace_id}-{span_id}-{flags}")
pub fn parse_trace_id(traceparent: &str) -> Option<String> {
    let parts: Vec<&str> = traceparent.split('-').collect();
    if parts.len() == 4 && parts[0] == "00" && parts[1].len() == 32 {
        Some(parts[1].to_string())
    } else {
        None
    }
}
