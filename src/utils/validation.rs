use crate::utils::error::{PlanError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PlanError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlanError::InvalidConfigValueError {
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
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// 表單數值欄位：空白視為 widget 的最小值 0，其餘必須是 [0, 500] 內的整數
pub fn parse_sugar_reading(field_name: &str, raw: &str) -> Result<u16> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let value: i64 = trimmed
        .parse()
        .map_err(|_| PlanError::validation(field_name, trimmed, "Value must be a whole number"))?;

    if !(i64::from(crate::domain::model::SUGAR_MIN)..=i64::from(crate::domain::model::SUGAR_MAX))
        .contains(&value)
    {
        return Err(PlanError::validation(
            field_name,
            value,
            format!(
                "Value must be between {} and {}",
                crate::domain::model::SUGAR_MIN,
                crate::domain::model::SUGAR_MAX
            ),
        ));
    }

    Ok(value as u16)
}

/// 字元能否以 WinAnsi (Windows-1252) 單一位元組輸出
pub fn is_win_ansi_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    lopdf::Document::encode_text(Some("WinAnsiEncoding"), c.encode_utf8(&mut buf)).len() == 1
}

pub fn validate_win_ansi(field_name: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| !is_win_ansi_char(*c)) {
        Some(c) => Err(PlanError::validation(
            field_name,
            value,
            format!(
                "'{}' is not supported; please use Latin (Windows-1252) characters",
                c
            ),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("llm.base_url", "https://api.anthropic.com").is_ok());
        assert!(validate_url("llm.base_url", "http://127.0.0.1:9000").is_ok());
        assert!(validate_url("llm.base_url", "").is_err());
        assert!(validate_url("llm.base_url", "invalid-url").is_err());
        assert!(validate_url("llm.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "127.0.0.1:8501").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("llm.temperature", 0.7, 0.0, 1.0).is_ok());
        assert!(validate_range("llm.temperature", 1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_parse_sugar_reading() {
        assert_eq!(parse_sugar_reading("fasting_sugar", "").unwrap(), 0);
        assert_eq!(parse_sugar_reading("fasting_sugar", " 120 ").unwrap(), 120);
        assert_eq!(parse_sugar_reading("fasting_sugar", "500").unwrap(), 500);
        assert!(parse_sugar_reading("fasting_sugar", "501").is_err());
        assert!(parse_sugar_reading("fasting_sugar", "-1").is_err());
        assert!(parse_sugar_reading("fasting_sugar", "12.5").is_err());
        assert!(parse_sugar_reading("fasting_sugar", "abc").is_err());
    }

    #[test]
    fn test_validate_win_ansi() {
        assert!(validate_win_ansi("name", "Ana María").is_ok());
        assert!(validate_win_ansi("name", "José “Pepe” Ñúñez").is_ok());
        assert!(validate_win_ansi("name", "Łukasz").is_err());
        assert!(validate_win_ansi("name", "عرفان").is_err());
        assert!(validate_win_ansi("name", "Mei 🍜").is_err());
        assert!(!is_win_ansi_char('\u{0}'));
    }
}
