use serde::{Deserialize, Deserializer, Serialize};

/// Gateway → Resolver 傳遞 CEP 的 header
pub const CEP_HEADER: &str = "x-cep";

/// Gateway 收到的請求 body；缺少 `cep` 時視為空字串，之後會被驗證擋下
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostalCodeRequest {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub cep: String,
}

/// `"cep": null` 與缺少欄位相同
fn deserialize_nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 目錄 API (ViaCEP) 的回應
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryLookupResult {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub erro: bool,
}

impl DirectoryLookupResult {
    pub fn city(&self) -> &str {
        &self.localidade
    }

    pub fn is_not_found(&self) -> bool {
        self.erro
    }
}

/// `erro` 可能是 `true`、`"true"` 或 `null`
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Null,
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
        Flag::Null => false,
    })
}

/// 天氣 API 的回應，只取需要的欄位
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherLookupResult {
    #[serde(default)]
    pub location: WeatherLocation,
    pub current: CurrentWeather,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherLocation {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temp_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_result_from_viacep_payload() {
        let payload = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        }"#;

        let result: DirectoryLookupResult = serde_json::from_str(payload).unwrap();
        assert_eq!(result.city(), "São Paulo");
        assert_eq!(result.uf, "SP");
        assert!(!result.is_not_found());
    }

    #[test]
    fn test_directory_error_flag_bool_string_or_null() {
        let as_bool: DirectoryLookupResult = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(as_bool.is_not_found());

        let as_text: DirectoryLookupResult = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(as_text.is_not_found());

        let explicit_false: DirectoryLookupResult =
            serde_json::from_str(r#"{"erro": false, "localidade": "Recife"}"#).unwrap();
        assert!(!explicit_false.is_not_found());

        let as_null: DirectoryLookupResult =
            serde_json::from_str(r#"{"erro": null, "localidade": "Recife"}"#).unwrap();
        assert!(!as_null.is_not_found());
        assert_eq!(as_null.city(), "Recife");
    }

    #[test]
    fn test_weather_result_ignores_extra_fields() {
        let payload = r#"{
            "location": {"name": "Sao Paulo", "region": "Sao Paulo", "country": "Brazil"},
            "current": {"temp_c": 28.5, "temp_f": 83.3, "condition": {"text": "Sunny"}}
        }"#;

        let result: WeatherLookupResult = serde_json::from_str(payload).unwrap();
        assert_eq!(result.location.name, "Sao Paulo");
        assert_eq!(result.current.temp_c, 28.5);
    }

    #[test]
    fn test_weather_result_requires_current() {
        assert!(serde_json::from_str::<WeatherLookupResult>(r#"{"location": {}}"#).is_err());
    }

    #[test]
    fn test_temperature_result_wire_names() {
        let result = TemperatureResult {
            city: "Curitiba".to_string(),
            temp_c: 10.0,
            temp_f: 50.0,
            temp_k: 283.0,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"city": "Curitiba", "temp_C": 10.0, "temp_F": 50.0, "temp_K": 283.0})
        );
    }

    #[test]
    fn test_postal_code_request_missing_field_is_empty() {
        let req: PostalCodeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.cep, "");

        let req: PostalCodeRequest = serde_json::from_str(r#"{"cep": null}"#).unwrap();
        assert_eq!(req.cep, "");

        assert!(serde_json::from_str::<PostalCodeRequest>(r#"{"cep": 1310100}"#).is_err());
    }
}
