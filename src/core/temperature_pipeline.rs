use crate::domain::model::TemperatureResult;
use crate::domain::ports::{DirectoryLookup, WeatherLookup};
use crate::utils::error::{CepError, Result};
use crate::utils::validation::validate_cep;
use std::sync::Arc;
use tracing::Instrument;

/// Resolver 的處理流程：驗證 → 查 CEP → 查溫度 → 換算
#[derive(Clone)]
pub struct TemperaturePipeline {
    directory: Arc<dyn DirectoryLookup>,
    weather: Arc<dyn WeatherLookup>,
}

impl TemperaturePipeline {
    pub fn new(directory: Arc<dyn DirectoryLookup>, weather: Arc<dyn WeatherLookup>) -> Self {
        Self { directory, weather }
    }

    pub async fn resolve(&self, cep: &str) -> Result<TemperatureResult> {
        // Gateway 已驗證過，這裡仍然自己驗證一次
        let is_valid = tracing::info_span!("resolver.validate_cep").in_scope(|| validate_cep(cep));
        if !is_valid {
            tracing::debug!(cep, "rejecting malformed CEP");
            return Err(CepError::InvalidZipcode);
        }

        let address = self
            .directory
            .lookup(cep)
            .instrument(tracing::info_span!("resolver.search_cep", cep))
            .await?;

        if address.is_not_found() {
            return Err(CepError::ZipcodeNotFound);
        }

        let city = address.city().to_string();
        let celsius = self
            .weather
            .current_celsius(&city)
            .instrument(tracing::info_span!("resolver.get_temperature", city = %city))
            .await?;

        let result = TemperatureResult::from_celsius(city, celsius);
        tracing::info!(
            city = %result.city,
            temp_c = result.temp_c,
            temp_f = result.temp_f,
            temp_k = result.temp_k,
            "✅ temperature resolved"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DirectoryLookupResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockDirectory {
        outcome: fn() -> Result<DirectoryLookupResult>,
        calls: AtomicUsize,
    }

    impl MockDirectory {
        fn new(outcome: fn() -> Result<DirectoryLookupResult>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DirectoryLookup for MockDirectory {
        async fn lookup(&self, _cep: &str) -> Result<DirectoryLookupResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    struct MockWeather {
        celsius: f64,
        cities: std::sync::Mutex<Vec<String>>,
    }

    impl MockWeather {
        fn new(celsius: f64) -> Self {
            Self {
                celsius,
                cities: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn cities(&self) -> Vec<String> {
            self.cities.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherLookup for MockWeather {
        async fn current_celsius(&self, city: &str) -> Result<f64> {
            self.cities.lock().unwrap().push(city.to_string());
            Ok(self.celsius)
        }
    }

    fn sao_paulo() -> Result<DirectoryLookupResult> {
        Ok(DirectoryLookupResult {
            cep: "01310-100".to_string(),
            localidade: "São Paulo".to_string(),
            uf: "SP".to_string(),
            ..Default::default()
        })
    }

    fn not_found() -> Result<DirectoryLookupResult> {
        Ok(DirectoryLookupResult {
            erro: true,
            ..Default::default()
        })
    }

    fn rejected() -> Result<DirectoryLookupResult> {
        Err(CepError::InvalidZipcode)
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let directory = Arc::new(MockDirectory::new(sao_paulo));
        let weather = Arc::new(MockWeather::new(28.5));
        let pipeline = TemperaturePipeline::new(directory.clone(), weather.clone());

        let result = pipeline.resolve("01310100").await.unwrap();

        assert_eq!(result.city, "São Paulo");
        assert_eq!(result.temp_c, 28.5);
        assert_eq!(result.temp_k, 301.5);
        assert_eq!(weather.cities(), vec!["São Paulo".to_string()]);
        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_cep_skips_all_lookups() {
        let directory = Arc::new(MockDirectory::new(sao_paulo));
        let weather = Arc::new(MockWeather::new(20.0));
        let pipeline = TemperaturePipeline::new(directory.clone(), weather.clone());

        let err = pipeline.resolve("1234-567").await.unwrap_err();

        assert!(matches!(err, CepError::InvalidZipcode));
        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
        assert!(weather.cities().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_skips_weather_lookup() {
        let directory = Arc::new(MockDirectory::new(not_found));
        let weather = Arc::new(MockWeather::new(20.0));
        let pipeline = TemperaturePipeline::new(directory, weather.clone());

        let err = pipeline.resolve("99999999").await.unwrap_err();

        assert!(matches!(err, CepError::ZipcodeNotFound));
        assert!(weather.cities().is_empty());
    }

    #[tokio::test]
    async fn test_directory_rejection_is_propagated() {
        let directory = Arc::new(MockDirectory::new(rejected));
        let weather = Arc::new(MockWeather::new(20.0));
        let pipeline = TemperaturePipeline::new(directory, weather.clone());

        let err = pipeline.resolve("00000000").await.unwrap_err();

        assert_eq!(err.status_code(), 422);
        assert!(weather.cities().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let pipeline = TemperaturePipeline::new(
            Arc::new(MockDirectory::new(sao_paulo)),
            Arc::new(MockWeather::new(21.3)),
        );

        let first = serde_json::to_vec(&pipeline.resolve("01310100").await.unwrap()).unwrap();
        let second = serde_json::to_vec(&pipeline.resolve("01310100").await.unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
