//! Integration test: loading market files from disk.

use fra_config::{load, ConfigError, CurveConfig, MarketFile, Validate};
use fra_core::types::Date;
use fra_instruments::Position;
use std::io::Write;
use tempfile::NamedTempFile;

const DEMO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/market.toml");

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_demo_market_is_valid() {
    let market = load(DEMO).unwrap();
    assert_eq!(market.evaluation_date, Date::from_ymd(2024, 2, 1).unwrap());
    assert_eq!(market.curves.len(), 2);
    assert_eq!(market.indices.len(), 2);
    assert_eq!(market.fras.len(), 4);
    assert!(market.validate().is_empty(), "{:?}", market.validate());

    match market.curve("EUR-DISC") {
        Some(CurveConfig::Discount(c)) => assert_eq!(c.pillars.len(), 4),
        other => panic!("unexpected curve {other:?}"),
    }
    assert_eq!(market.index("EUR3M").unwrap().fixings.len(), 2);
    assert_eq!(market.fra("FRA-1x4-PAR").unwrap().position, Position::Short);
}

#[test]
fn test_toml_and_json_agree() {
    let from_toml = load(DEMO).unwrap();
    let json = serde_json::to_string_pretty(&from_toml).unwrap();
    let file = write_temp(".json", &json);
    let from_json: MarketFile = load(file.path()).unwrap();
    assert_eq!(from_toml, from_json);
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let file = write_temp(
        ".toml",
        r#"
evaluation_date = "2024-02-01"

[[fras]]
id = "BAD"
value_date = "2024-03-04"
strike = 0.03
notional = -1.0
index = "MISSING"
"#,
    );
    let market = load(file.path()).unwrap();
    let errors = market.validate();
    assert_eq!(errors.len(), 2);

    match market.validate_or_error() {
        Err(ConfigError::MultipleValidationErrors(all)) => assert_eq!(all, errors),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_malformed_toml() {
    let file = write_temp(".toml", "evaluation_date = \"2024-02-30\"\n");
    assert!(matches!(load(file.path()), Err(ConfigError::Parse { .. })));
}
