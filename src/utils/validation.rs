use crate::utils::error::{CepError, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const CEP_LENGTH: usize = 8;

/// CEP 必須剛好是 8 個 ASCII 數字，不做任何正規化 (不去空白、不去連字號)
pub fn validate_cep(cep: &str) -> bool {
    cep.len() == CEP_LENGTH && cep.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CepError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 解析監聽位址，接受 `:8080`、`8080` 與 `host:port`
pub fn parse_listen_addr(field_name: &str, value: &str) -> Result<SocketAddr> {
    let invalid = |reason: String| CepError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason,
    };

    let trimmed = value.trim();
    let port_only = trimmed.strip_prefix(':').unwrap_or(trimmed);
    if let Ok(port) = port_only.parse::<u16>() {
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
    }

    trimmed
        .parse::<SocketAddr>()
        .map_err(|e| invalid(format!("Expected ':port' or 'host:port': {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cep_accepts_eight_digits() {
        assert!(validate_cep("01310100"));
        assert!(validate_cep("99999999"));
        assert!(validate_cep("00000000"));
    }

    #[test]
    fn test_validate_cep_rejects_wrong_length() {
        assert!(!validate_cep(""));
        assert!(!validate_cep("123"));
        assert!(!validate_cep("0131010"));
        assert!(!validate_cep("013101000"));
    }

    #[test]
    fn test_validate_cep_rejects_non_digits() {
        assert!(!validate_cep("01310-10"));
        assert!(!validate_cep("0131010a"));
        assert!(!validate_cep(" 1310100"));
        assert!(!validate_cep("01310100 "));
        // 全形數字與其他 Unicode 數字不算
        assert!(!validate_cep("０１３１０１００"));
        assert!(!validate_cep("٠١٣١٠١٠٠"));
    }

    #[test]
    fn test_validate_cep_exhaustive_single_char_substitution() {
        let base: Vec<char> = "01310100".chars().collect();
        for pos in 0..base.len() {
            for c in (0u8..=127).map(char::from) {
                let mut candidate = base.clone();
                candidate[pos] = c;
                let s: String = candidate.into_iter().collect();
                assert_eq!(validate_cep(&s), c.is_ascii_digit(), "candidate {:?}", s);
            }
        }
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("resolver_url", "https://example.com").is_ok());
        assert!(validate_url("resolver_url", "http://servico-b:8081").is_ok());
        assert!(validate_url("resolver_url", "").is_err());
        assert!(validate_url("resolver_url", "invalid-url").is_err());
        assert!(validate_url("resolver_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number_and_range() {
        assert!(validate_positive_number("max_attempts", 20, 1).is_ok());
        assert!(validate_positive_number("max_attempts", 0, 1).is_err());
        assert!(validate_range("timeout", 10, 1, 300).is_ok());
        assert!(validate_range("timeout", 0, 1, 300).is_err());
        assert!(validate_range("timeout", 301, 1, 300).is_err());
    }

    #[test]
    fn test_parse_listen_addr_forms() {
        let addr = parse_listen_addr("http_port", ":8080").unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());

        assert_eq!(parse_listen_addr("http_port", "8081").unwrap().port(), 8081);

        let addr = parse_listen_addr("http_port", "127.0.0.1:9000").unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:9000");

        assert!(parse_listen_addr("http_port", "not-a-port").is_err());
        assert!(parse_listen_addr("http_port", ":99999").is_err());
    }
}
