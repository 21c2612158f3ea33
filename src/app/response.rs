use crate::domain::model::ErrorBody;
use crate::utils::error::{CepError, ErrorKind};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// 4xx 驗證錯誤以 `{"error": ...}` 回傳，其餘 (body 無法解析、5xx) 回純文字
impl IntoResponse for CepError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match (&self, self.kind()) {
            (CepError::MalformedBody { reason }, _) => {
                tracing::info!(reason = %reason, "rejecting malformed request body");
                (status, "invalid request body").into_response()
            }
            (_, ErrorKind::BadRequest | ErrorKind::InvalidFormat | ErrorKind::NotFound) => {
                tracing::info!(status = status.as_u16(), "❌ {}", self);
                (status, Json(ErrorBody::new(self.to_string()))).into_response()
            }
            _ => {
                tracing::error!(status = status.as_u16(), "❌ {}", self);
                (status, self.to_string()).into_response()
            }
        }
    }
}
