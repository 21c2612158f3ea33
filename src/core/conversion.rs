use crate::domain::model::TemperatureResult;

/// 凱氏溫標使用 +273 (不是 273.15)，輸出需和既有服務一致
pub const KELVIN_OFFSET: f64 = 273.0;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

impl TemperatureResult {
    pub fn from_celsius(city: impl Into<String>, celsius: f64) -> Self {
        Self {
            city: city.into(),
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(celsius_to_kelvin(0.0), 273.0);
        assert_eq!(celsius_to_kelvin(-273.0), 0.0);
        assert_eq!(celsius_to_kelvin(28.5), 301.5);
    }

    #[test]
    fn test_conversion_is_unrounded() {
        for celsius in [-12.3, -0.1, 0.05, 17.77, 28.5, 41.9] {
            assert_eq!(celsius_to_fahrenheit(celsius), celsius * 1.8 + 32.0);
            assert_eq!(celsius_to_kelvin(celsius), celsius + 273.0);
        }
    }

    #[test]
    fn test_from_celsius() {
        let result = TemperatureResult::from_celsius("São Paulo", 28.5);
        assert_eq!(result.city, "São Paulo");
        assert_eq!(result.temp_c, 28.5);
        assert!((result.temp_f - 83.3).abs() < 1e-9);
        assert_eq!(result.temp_k, 301.5);
    }
}
