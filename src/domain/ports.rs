use crate::domain::model::DirectoryLookupResult;
use crate::utils::error::Result;
use async_trait::async_trait;
use axum::body::Bytes;
use http::StatusCode;

/// CEP → 地址/城市
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    async fn lookup(&self, cep: &str) -> Result<DirectoryLookupResult>;
}

/// 城市 → 目前攝氏溫度
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current_celsius(&self, city: &str) -> Result<f64>;
}

/// Resolver 的原始回應，狀態碼與 body 都不做解讀
#[derive(Debug, Clone)]
pub struct ResolverReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Gateway → Resolver 的呼叫
#[async_trait]
pub trait ResolverClient: Send + Sync {
    async fn temperature(&self, cep: &str) -> Result<ResolverReply>;
}
