//! Reading market files from TOML and JSON.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::market::MarketFile;

/// Parses a market file from TOML text.
pub fn from_toml_str(text: &str) -> ConfigResult<MarketFile> {
    Ok(toml::from_str(text)?)
}

/// Parses a market file from JSON text.
pub fn from_json_str(text: &str) -> ConfigResult<MarketFile> {
    Ok(serde_json::from_str(text)?)
}

/// Loads a market file, choosing the format from the extension.
///
/// The file is parsed but not validated.
///
/// # Errors
///
/// `Io` if the file cannot be read, `UnsupportedFormat` for extensions
/// other than `.toml` and `.json`, `Parse` for malformed content.
pub fn load(path: impl AsRef<Path>) -> ConfigResult<MarketFile> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> ConfigResult<MarketFile> = match extension.as_deref() {
        Some("toml") => from_toml_str,
        Some("json") => from_json_str,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::CurveConfig;

    const MINIMAL: &str = r#"
evaluation_date = "2024-02-01"

[[curves]]
type = "flat"
name = "ESTR"
rate = 0.035
"#;

    #[test]
    fn test_minimal_toml_defaults() {
        let market = from_toml_str(MINIMAL).unwrap();
        assert!(!market.include_reference_date_events);
        assert!(market.indices.is_empty());
        match &market.curves[0] {
            CurveConfig::Flat(c) => {
                assert_eq!(c.name, "ESTR");
                assert!(c.reference_date.is_none());
                assert_eq!(c.day_count.to_string(), "ACT/365F");
            }
            other => panic!("unexpected curve {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        let err = from_toml_str("evaluation_date = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));

        let err = from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "JSON", .. }));
    }

    #[test]
    fn test_unknown_extension() {
        let err = load("market.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load("/nonexistent/market.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
