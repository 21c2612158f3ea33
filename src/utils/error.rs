use thiserror::Error;

/// 錯誤分類，HTTP 狀態碼只依此決定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 請求本身不完整 (body 無法解析、缺少 header)
    BadRequest,
    /// CEP 格式錯誤，或目錄 API 認為 CEP 無效
    InvalidFormat,
    /// 目錄 API 找不到該 CEP
    NotFound,
    /// 外部服務失敗 (連線、解碼、非預期狀態碼)
    UpstreamFailure,
    /// 缺少必要設定 (例如 WEATHER_API_KEY)
    ConfigMissing,
    Internal,
}

#[derive(Error, Debug)]
pub enum CepError {
    #[error("invalid request body: {reason}")]
    MalformedBody { reason: String },

    #[error("CEP header is required")]
    MissingCepHeader,

    #[error("invalid zipcode")]
    InvalidZipcode,

    #[error("can not find zipcode")]
    ZipcodeNotFound,

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("weather API returned status {status}: {body}")]
    WeatherApi { status: u16, body: String },

    #[error("{field} not set")]
    MissingConfig { field: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Telemetry error: {message}")]
    Telemetry { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CepError::MalformedBody { .. } | CepError::MissingCepHeader => ErrorKind::BadRequest,
            CepError::InvalidZipcode => ErrorKind::InvalidFormat,
            CepError::ZipcodeNotFound => ErrorKind::NotFound,
            CepError::Http(_) | CepError::Decode(_) | CepError::WeatherApi { .. } => {
                ErrorKind::UpstreamFailure
            }
            CepError::MissingConfig { .. } => ErrorKind::ConfigMissing,
            CepError::ConfigError { .. }
            | CepError::InvalidConfigValueError { .. }
            | CepError::Telemetry { .. }
            | CepError::IoError(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> http::StatusCode {
        match self.kind() {
            ErrorKind::BadRequest => http::StatusCode::BAD_REQUEST,
            ErrorKind::InvalidFormat => http::StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => http::StatusCode::NOT_FOUND,
            ErrorKind::UpstreamFailure | ErrorKind::ConfigMissing | ErrorKind::Internal => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 啟動階段錯誤的修正建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CepError::InvalidConfigValueError { .. } | CepError::ConfigError { .. } => {
                "Check the command line flags, environment variables and --config file"
            }
            CepError::MissingConfig { .. } => "Export the missing environment variable and restart",
            CepError::IoError(_) => "Check that the listen address is free and readable files exist",
            _ => "See the logs for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, CepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_kind() {
        assert_eq!(CepError::MissingCepHeader.status_code(), 400);
        assert_eq!(
            CepError::MalformedBody {
                reason: "eof".to_string()
            }
            .status_code(),
            400
        );
        assert_eq!(CepError::InvalidZipcode.status_code(), 422);
        assert_eq!(CepError::ZipcodeNotFound.status_code(), 404);
        assert_eq!(
            CepError::WeatherApi {
                status: 401,
                body: "{}".to_string()
            }
            .status_code(),
            500
        );
        assert_eq!(
            CepError::MissingConfig {
                field: "WEATHER_API_KEY".to_string()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_messages_match_wire_contract() {
        assert_eq!(CepError::InvalidZipcode.to_string(), "invalid zipcode");
        assert_eq!(CepError::ZipcodeNotFound.to_string(), "can not find zipcode");
        assert_eq!(CepError::MissingCepHeader.to_string(), "CEP header is required");
        assert_eq!(
            CepError::MissingConfig {
                field: "WEATHER_API_KEY".to_string()
            }
            .to_string(),
            "WEATHER_API_KEY not set"
        );
        assert_eq!(
            CepError::WeatherApi {
                status: 403,
                body: "denied".to_string()
            }
            .to_string(),
            "weather API returned status 403: denied"
        );
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(CepError::InvalidZipcode.kind(), ErrorKind::InvalidFormat);
        assert_eq!(CepError::ZipcodeNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            CepError::MissingConfig {
                field: "k".to_string()
            }
            .kind(),
            ErrorKind::ConfigMissing
        );
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CepError::from(decode).kind(), ErrorKind::UpstreamFailure);
    }
}
